use anchor_lang::prelude::*;

pub mod instructions;
pub mod state;
pub mod errors;
pub mod messages;
pub mod verification;
pub mod ed25519_utils;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use instructions::*;
pub use state::{
    AttestorConfig,
    CommitteeSet,
    CommitteeSnapshot,
    BackingAttestation,
    BackingFact,
    LatestAttestation,
};
pub use errors::BridgeError;
pub use ed25519_utils::SignedMessage;
pub use messages::{
    SignedPayload,
    AttestationPayload,
    MintAuthorization,
    ReleaseAuthorization,
    SettlementAuthorization,
};

declare_id!("BXBZtvFfCtCapQgqFTxGQ9hgJTQZUoHFzBXD2V3ys5C5");

/// Domain separator prefixed to every payload the committee signs
/// Prevents signatures made for any other protocol from verifying here
pub const DOMAIN_SEPARATOR: &str = "COLLATERAL_BRIDGE_V1";

pub mod config {
    /// Hard upper bound on committee size (matches `#[max_len]` on
    /// `CommitteeSet::signers`)
    pub const MAX_COMMITTEE_SIZE: usize = 16;

    /// Default staleness bound for backing attestations (1 hour)
    pub const DEFAULT_MAX_STALENESS_SECS: i64 = 3_600;

    /// Default tolerance for `observed_at` ahead of the ledger clock
    pub const DEFAULT_CLOCK_SKEW_SECS: i64 = 30;
}

#[program]
pub mod bridge_committee {
    use super::*;

    /// Create the committee and chain-local attestation config (run once)
    pub fn initialize_committee(
        ctx: Context<InitializeCommittee>,
        params: InitializeCommitteeParams,
    ) -> Result<()> {
        instructions::initialize_committee::handler(ctx, params)
    }

    pub fn add_signer(ctx: Context<UpdateCommittee>, signer: Pubkey) -> Result<()> {
        instructions::update_committee::add_signer(ctx, signer)
    }

    pub fn remove_signer(ctx: Context<UpdateCommittee>, signer: Pubkey) -> Result<()> {
        instructions::update_committee::remove_signer(ctx, signer)
    }

    pub fn set_threshold(ctx: Context<UpdateCommittee>, threshold: u8) -> Result<()> {
        instructions::update_committee::set_threshold(ctx, threshold)
    }

    /// Exactly the active committee and its threshold
    pub fn current_set(ctx: Context<CurrentSet>) -> Result<CommitteeSnapshot> {
        instructions::update_committee::current_set(ctx)
    }

    pub fn transfer_admin(ctx: Context<UpdateAttestorConfig>, new_admin: Pubkey) -> Result<()> {
        instructions::update_committee::transfer_admin(ctx, new_admin)
    }

    pub fn update_staleness(
        ctx: Context<UpdateAttestorConfig>,
        max_staleness_secs: i64,
        clock_skew_secs: i64,
    ) -> Result<()> {
        instructions::update_committee::update_staleness(ctx, max_staleness_secs, clock_skew_secs)
    }

    /// Replace the stored backing fact with a newer committee-signed one
    pub fn submit_attestation(ctx: Context<SubmitAttestation>, fact: BackingFact) -> Result<()> {
        instructions::submit_attestation::handler(ctx, fact)
    }

    /// Latest stored fact for (source_chain, asset) and whether it is stale
    pub fn latest_attestation(
        ctx: Context<ReadAttestation>,
        source_chain: u64,
        asset: Pubkey,
    ) -> Result<LatestAttestation> {
        instructions::submit_attestation::latest_handler(ctx, source_chain, asset)
    }
}
