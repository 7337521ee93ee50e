use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::ID as IX_SYSVAR_ID;
use anchor_spl::token::{Mint, Token, TokenAccount};
use bridge_committee::ed25519_utils::load_signed_messages;
use bridge_committee::{
    AttestorConfig, BackingAttestation, BridgeError, CommitteeSet, MintAuthorization,
    ID as COMMITTEE_PROGRAM_ID,
};

use crate::state::{MintAuthorityConfig, MintContext, MintLedger, MintRecord};
use crate::token_accounting::mint_wrapped;

/// Mint wrapped supply against attested backing
///
/// Transaction layout:
/// [0..n] Ed25519Program.verify(signer_i, signing_bytes(MintAuthorization))
/// [n]    BridgeMint.request_mint(request)  <- We are here
///
/// Any relayer may submit; the recipient is fixed by the signed request.
#[derive(Accounts)]
#[instruction(request: MintAuthorization)]
pub struct RequestMint<'info> {
    #[account(mut)]
    pub relayer: Signer<'info>,

    #[account(
        seeds = [b"mint_config"],
        bump = mint_config.bump
    )]
    pub mint_config: Account<'info, MintAuthorityConfig>,

    #[account(
        seeds = [b"attestor_config"],
        bump = attestor_config.bump,
        seeds::program = COMMITTEE_PROGRAM_ID
    )]
    pub attestor_config: Account<'info, AttestorConfig>,

    #[account(
        seeds = [b"committee_set"],
        bump = committee_set.bump,
        seeds::program = COMMITTEE_PROGRAM_ID
    )]
    pub committee_set: Account<'info, CommitteeSet>,

    /// CHECK: latest backing for (source_chain, asset) on this chain's
    /// store. PDA checked by seeds; may not exist yet, in which case the
    /// mint fails as stale.
    #[account(
        seeds = [
            BackingAttestation::SEED_PREFIX,
            request.source_chain.to_le_bytes().as_ref(),
            request.asset.as_ref()
        ],
        bump,
        seeds::program = COMMITTEE_PROGRAM_ID
    )]
    pub backing_attestation: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [
            MintLedger::SEED_PREFIX,
            request.source_chain.to_le_bytes().as_ref(),
            request.asset.as_ref()
        ],
        bump = mint_ledger.bump,
        has_one = wrapped_mint @ BridgeError::AssetMismatch
    )]
    pub mint_ledger: Account<'info, MintLedger>,

    #[account(mut)]
    pub wrapped_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = recipient_token_account.owner == request.recipient @ BridgeError::Unauthorized,
        constraint = recipient_token_account.mint == wrapped_mint.key() @ BridgeError::AssetMismatch,
    )]
    pub recipient_token_account: Account<'info, TokenAccount>,

    /// Seeds: ["mint_record", source_chain, dest_chain, asset, nonce]
    #[account(
        init_if_needed,
        payer = relayer,
        space = 8 + MintRecord::INIT_SPACE,
        seeds = [
            MintRecord::SEED_PREFIX,
            request.source_chain.to_le_bytes().as_ref(),
            request.dest_chain.to_le_bytes().as_ref(),
            request.asset.as_ref(),
            request.nonce.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub mint_record: Account<'info, MintRecord>,

    /// CHECK: address constrained to the instructions sysvar
    #[account(address = IX_SYSVAR_ID)]
    pub instructions: AccountInfo<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<RequestMint>, request: MintAuthorization) -> Result<()> {
    msg!("🪙 Mint request");
    msg!("   Nonce: {}", request.nonce);
    msg!("   Route: {} -> {}", request.source_chain, request.dest_chain);
    msg!("   Asset: {}", request.asset);
    msg!("   Amount: {}", request.amount);
    msg!("   Recipient: {}", request.recipient);
    msg!("   Attestation version: {}", request.attestation_version);

    let signed = load_signed_messages(&ctx.accounts.instructions)?;
    let now = Clock::get()?.unix_timestamp;
    let attestation = BackingAttestation::from_account_info(
        &ctx.accounts.backing_attestation,
        request.source_chain,
        request.asset,
    )?;

    let mint_ctx = MintContext {
        chain_id: ctx.accounts.mint_config.chain_id,
        committee_set: &ctx.accounts.committee_set,
        attestation: &attestation,
        max_staleness_secs: ctx.accounts.attestor_config.max_staleness_secs,
        now,
    };
    ctx.accounts
        .mint_ledger
        .authorize_mint(&ctx.accounts.mint_record, &request, &signed, &mint_ctx)?;

    msg!("✓ Nonce free, quorum met, backing fresh and sufficient");

    mint_wrapped(
        &ctx.accounts.token_program,
        &ctx.accounts.wrapped_mint,
        &ctx.accounts.recipient_token_account,
        &ctx.accounts.mint_ledger,
        request.amount,
    )?;

    let mint_ledger = &mut ctx.accounts.mint_ledger;
    let mint_record = &mut ctx.accounts.mint_record;
    mint_ledger.commit_mint(mint_record, &request, now)?;
    mint_record.bump = ctx.bumps.mint_record;

    emit!(WrappedMinted {
        nonce: request.nonce,
        source_chain: request.source_chain,
        dest_chain: request.dest_chain,
        asset: request.asset,
        amount: request.amount,
        recipient: request.recipient,
        attestation_version: request.attestation_version,
        minted_total: mint_ledger.minted_total,
    });

    msg!("✅ Minted {} (ledger total: {})", request.amount, mint_ledger.minted_total);
    Ok(())
}

#[event]
pub struct WrappedMinted {
    pub nonce: u64,
    pub source_chain: u64,
    pub dest_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
    pub attestation_version: u64,
    pub minted_total: u64,
}
