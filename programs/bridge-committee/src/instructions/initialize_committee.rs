use anchor_lang::prelude::*;
use crate::state::{AttestorConfig, CommitteeSet};

#[derive(Accounts)]
pub struct InitializeCommittee<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + AttestorConfig::INIT_SPACE,
        seeds = [b"attestor_config"],
        bump
    )]
    pub config: Account<'info, AttestorConfig>,

    #[account(
        init,
        payer = admin,
        space = 8 + CommitteeSet::INIT_SPACE,
        seeds = [b"committee_set"],
        bump
    )]
    pub committee_set: Account<'info, CommitteeSet>,

    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeCommitteeParams {
    /// Identifier of the chain this program is deployed on
    pub chain_id: u64,

    /// Initial attestor identities (Ed25519 keys of the MPC parties)
    pub signers: Vec<Pubkey>,

    pub threshold: u8,

    pub max_size: u8,

    pub max_staleness_secs: i64,

    pub clock_skew_secs: i64,
}

pub fn handler(ctx: Context<InitializeCommittee>, params: InitializeCommitteeParams) -> Result<()> {
    msg!("🔧 Initializing attestor committee");

    CommitteeSet::validate_membership(&params.signers, params.threshold, params.max_size)?;
    AttestorConfig::validate_bounds(params.max_staleness_secs, params.clock_skew_secs)?;

    let config = &mut ctx.accounts.config;
    config.admin = ctx.accounts.admin.key();
    config.chain_id = params.chain_id;
    config.max_staleness_secs = params.max_staleness_secs;
    config.clock_skew_secs = params.clock_skew_secs;
    config.bump = ctx.bumps.config;

    let committee_set = &mut ctx.accounts.committee_set;
    committee_set.version = 1;
    committee_set.signers = params.signers;
    committee_set.threshold = params.threshold;
    committee_set.max_size = params.max_size;
    committee_set.bump = ctx.bumps.committee_set;

    msg!("✅ Committee initialized");
    msg!("   Chain: {}", config.chain_id);
    msg!("   Signers: {}", committee_set.signers.len());
    msg!("   Threshold: {}", committee_set.threshold);
    msg!("   Max size: {}", committee_set.max_size);
    msg!("   Max staleness: {}s", config.max_staleness_secs);

    emit!(crate::instructions::CommitteeChanged {
        version: committee_set.version,
        digest: committee_set.digest(),
        signer_count: committee_set.signers.len() as u8,
        threshold: committee_set.threshold,
        change: crate::instructions::CommitteeChange::Initialized,
    });

    Ok(())
}
