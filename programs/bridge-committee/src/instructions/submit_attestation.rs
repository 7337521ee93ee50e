use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::ID as IX_SYSVAR_ID;

use crate::ed25519_utils::{load_signed_messages, SignedMessage};
use crate::messages::AttestationPayload;
use crate::state::{AttestorConfig, BackingAttestation, BackingFact, CommitteeSet, LatestAttestation};
use crate::verification::verify_quorum;

/// Submit a committee-signed backing fact for (source_chain, asset)
///
/// Transaction layout:
/// [0..n] Ed25519Program.verify(signer_i, signing_bytes(AttestationPayload))
/// [n]    BridgeCommittee.submit_attestation(fact)  <- We are here
///
/// The payload binds this store's chain id, so the same fact signed for
/// another chain's store does not verify here.
#[derive(Accounts)]
#[instruction(fact: BackingFact)]
pub struct SubmitAttestation<'info> {
    /// Relayer paying for the account; carries no authority
    #[account(mut)]
    pub relayer: Signer<'info>,

    #[account(
        seeds = [b"attestor_config"],
        bump = config.bump
    )]
    pub config: Account<'info, AttestorConfig>,

    #[account(
        seeds = [b"committee_set"],
        bump = committee_set.bump
    )]
    pub committee_set: Account<'info, CommitteeSet>,

    /// Seeds: ["backing_attestation", source_chain, asset]
    #[account(
        init_if_needed,
        payer = relayer,
        space = 8 + BackingAttestation::INIT_SPACE,
        seeds = [
            BackingAttestation::SEED_PREFIX,
            fact.source_chain.to_le_bytes().as_ref(),
            fact.asset.as_ref()
        ],
        bump
    )]
    pub backing_attestation: Account<'info, BackingAttestation>,

    /// CHECK: address constrained to the instructions sysvar
    #[account(address = IX_SYSVAR_ID)]
    pub instructions: AccountInfo<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(source_chain: u64, asset: Pubkey)]
pub struct ReadAttestation<'info> {
    #[account(
        seeds = [b"attestor_config"],
        bump = config.bump
    )]
    pub config: Account<'info, AttestorConfig>,

    /// CHECK: PDA checked by seeds; may not exist yet, read through
    /// `BackingAttestation::from_account_info`
    #[account(
        seeds = [
            BackingAttestation::SEED_PREFIX,
            source_chain.to_le_bytes().as_ref(),
            asset.as_ref()
        ],
        bump
    )]
    pub backing_attestation: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<SubmitAttestation>, fact: BackingFact) -> Result<()> {
    msg!("🔐 Verifying backing attestation");
    msg!("   Source chain: {}", fact.source_chain);
    msg!("   Asset: {}", fact.asset);
    msg!("   Backing: {}", fact.backing_amount);
    msg!("   Observed at: {}", fact.observed_at);
    msg!("   Version: {}", fact.version);

    let signed = load_signed_messages(&ctx.accounts.instructions)?;
    let now = Clock::get()?.unix_timestamp;

    let backing_attestation = &mut ctx.accounts.backing_attestation;
    accept_attestation(
        backing_attestation,
        &fact,
        &signed,
        &ctx.accounts.committee_set,
        &ctx.accounts.config,
        now,
    )?;
    backing_attestation.bump = ctx.bumps.backing_attestation;

    emit!(AttestationSubmitted {
        source_chain: fact.source_chain,
        asset: fact.asset,
        backing_amount: fact.backing_amount,
        observed_at: fact.observed_at,
        version: fact.version,
        committee_version: ctx.accounts.committee_set.version,
    });

    msg!("✅ Backing attestation stored (version {})", fact.version);
    Ok(())
}

/// Validate-then-replace for one attestation. Nothing is written unless
/// the quorum, version and clock checks all pass.
pub fn accept_attestation(
    stored: &mut BackingAttestation,
    fact: &BackingFact,
    signed: &[SignedMessage],
    committee_set: &CommitteeSet,
    config: &AttestorConfig,
    now: i64,
) -> Result<()> {
    let payload = AttestationPayload {
        store_chain: config.chain_id,
        fact: fact.clone(),
    };
    verify_quorum(&payload, signed, committee_set)?;
    stored.supersede(fact, now, config.clock_skew_secs)
}

pub fn latest_handler(
    ctx: Context<ReadAttestation>,
    source_chain: u64,
    asset: Pubkey,
) -> Result<LatestAttestation> {
    let now = Clock::get()?.unix_timestamp;
    let attestation =
        BackingAttestation::from_account_info(&ctx.accounts.backing_attestation, source_chain, asset)?;
    Ok(attestation.latest(now, ctx.accounts.config.max_staleness_secs))
}

#[event]
pub struct AttestationSubmitted {
    pub source_chain: u64,
    pub asset: Pubkey,
    pub backing_amount: u64,
    pub observed_at: i64,
    pub version: u64,
    pub committee_version: u64,
}
