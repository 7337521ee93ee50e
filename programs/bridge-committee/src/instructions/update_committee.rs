use anchor_lang::prelude::*;
use crate::state::{AttestorConfig, CommitteeSet, CommitteeSnapshot};

/// Governance-gated committee mutation. Each handler performs one
/// enumerable change and emits it as a `CommitteeChanged` event.
#[derive(Accounts)]
pub struct UpdateCommittee<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [b"attestor_config"],
        bump = config.bump,
        has_one = admin @ crate::errors::BridgeError::Unauthorized
    )]
    pub config: Account<'info, AttestorConfig>,

    #[account(
        mut,
        seeds = [b"committee_set"],
        bump = committee_set.bump
    )]
    pub committee_set: Account<'info, CommitteeSet>,
}

#[derive(Accounts)]
pub struct UpdateAttestorConfig<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [b"attestor_config"],
        bump = config.bump,
        has_one = admin @ crate::errors::BridgeError::Unauthorized
    )]
    pub config: Account<'info, AttestorConfig>,
}

#[derive(Accounts)]
pub struct CurrentSet<'info> {
    #[account(
        seeds = [b"committee_set"],
        bump = committee_set.bump
    )]
    pub committee_set: Account<'info, CommitteeSet>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum CommitteeChange {
    Initialized,
    SignerAdded(Pubkey),
    SignerRemoved(Pubkey),
    ThresholdChanged(u8),
}

#[event]
pub struct CommitteeChanged {
    pub version: u64,
    pub digest: [u8; 32],
    pub signer_count: u8,
    pub threshold: u8,
    pub change: CommitteeChange,
}

#[event]
pub struct AttestorConfigChanged {
    pub admin: Pubkey,
    pub max_staleness_secs: i64,
    pub clock_skew_secs: i64,
}

fn emit_change(committee_set: &CommitteeSet, change: CommitteeChange) {
    msg!(
        "✅ Committee v{}: {} signers, threshold {}",
        committee_set.version,
        committee_set.signers.len(),
        committee_set.threshold
    );

    emit!(CommitteeChanged {
        version: committee_set.version,
        digest: committee_set.digest(),
        signer_count: committee_set.signers.len() as u8,
        threshold: committee_set.threshold,
        change,
    });
}

pub fn add_signer(ctx: Context<UpdateCommittee>, signer: Pubkey) -> Result<()> {
    msg!("➕ Adding signer {}", signer);

    let committee_set = &mut ctx.accounts.committee_set;
    committee_set.add_signer(signer)?;

    emit_change(committee_set, CommitteeChange::SignerAdded(signer));
    Ok(())
}

pub fn remove_signer(ctx: Context<UpdateCommittee>, signer: Pubkey) -> Result<()> {
    msg!("➖ Removing signer {}", signer);

    let committee_set = &mut ctx.accounts.committee_set;
    committee_set.remove_signer(&signer)?;

    emit_change(committee_set, CommitteeChange::SignerRemoved(signer));
    Ok(())
}

pub fn set_threshold(ctx: Context<UpdateCommittee>, threshold: u8) -> Result<()> {
    msg!("🔄 Setting threshold to {}", threshold);

    let committee_set = &mut ctx.accounts.committee_set;
    committee_set.set_threshold(threshold)?;

    emit_change(committee_set, CommitteeChange::ThresholdChanged(threshold));
    Ok(())
}

pub fn current_set(ctx: Context<CurrentSet>) -> Result<CommitteeSnapshot> {
    Ok(ctx.accounts.committee_set.current_set())
}

pub fn transfer_admin(ctx: Context<UpdateAttestorConfig>, new_admin: Pubkey) -> Result<()> {
    require!(
        new_admin != Pubkey::default(),
        crate::errors::BridgeError::Unauthorized
    );

    let config = &mut ctx.accounts.config;
    msg!("🔑 Admin {} -> {}", config.admin, new_admin);
    config.admin = new_admin;

    emit!(AttestorConfigChanged {
        admin: config.admin,
        max_staleness_secs: config.max_staleness_secs,
        clock_skew_secs: config.clock_skew_secs,
    });
    Ok(())
}

pub fn update_staleness(
    ctx: Context<UpdateAttestorConfig>,
    max_staleness_secs: i64,
    clock_skew_secs: i64,
) -> Result<()> {
    AttestorConfig::validate_bounds(max_staleness_secs, clock_skew_secs)?;

    let config = &mut ctx.accounts.config;
    config.max_staleness_secs = max_staleness_secs;
    config.clock_skew_secs = clock_skew_secs;

    msg!(
        "⏱  Staleness bound {}s, clock skew {}s",
        max_staleness_secs,
        clock_skew_secs
    );

    emit!(AttestorConfigChanged {
        admin: config.admin,
        max_staleness_secs,
        clock_skew_secs,
    });
    Ok(())
}
