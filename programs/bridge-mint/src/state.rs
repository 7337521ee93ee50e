use anchor_lang::prelude::*;
use bridge_committee::verification::verify_quorum;
use bridge_committee::{
    BackingAttestation, BridgeError, CommitteeSet, MintAuthorization, SettlementAuthorization,
    SignedMessage,
};

use crate::token_accounting::BurnProof;

/// Mint program configuration for this chain
#[account]
#[derive(InitSpace)]
pub struct MintAuthorityConfig {
    pub admin: Pubkey,

    /// Copied from the committee's AttestorConfig at initialization
    pub chain_id: u64,

    pub bump: u8,
}

/// Wrapped supply of one (source_chain, asset) on this chain
///
/// Seeds: ["mint_ledger", source_chain, asset]
///
/// The ledger PDA is the mint authority of `wrapped_mint`; `minted_total`
/// tracks the wrapped supply this ledger put in circulation.
#[account]
#[derive(InitSpace)]
pub struct MintLedger {
    pub source_chain: u64,
    pub asset: Pubkey,
    pub wrapped_mint: Pubkey,

    pub minted_total: u64,

    /// Held back from the attested backing before a mint is allowed
    pub safety_margin: u64,

    /// Next withdraw id; starts at 1 and only ever increments
    pub next_withdraw_id: u64,

    pub mints_processed: u64,
    pub withdraws_opened: u64,

    pub bump: u8,
}

/// Everything a mint reads besides the ledger itself
pub struct MintContext<'a> {
    pub chain_id: u64,
    pub committee_set: &'a CommitteeSet,
    pub attestation: &'a BackingAttestation,
    pub max_staleness_secs: i64,
    pub now: i64,
}

impl MintLedger {
    pub const SEED_PREFIX: &'static [u8] = b"mint_ledger";

    /// Backing usable for mints once the safety margin is held back
    pub fn mintable_backing(&self, attestation: &BackingAttestation) -> u64 {
        attestation.backing_amount.saturating_sub(self.safety_margin)
    }

    /// Validate a mint request without touching any state.
    ///
    /// Order: nonce, chain binding and signatures, attestation freshness and
    /// version, backing. The first failure is returned. A store that was
    /// never written has version 0 and fails as stale.
    pub fn authorize_mint(
        &self,
        record: &MintRecord,
        request: &MintAuthorization,
        signed: &[SignedMessage],
        ctx: &MintContext,
    ) -> Result<()> {
        require!(!record.consumed, BridgeError::ReplayedNonce);

        require!(request.amount > 0, BridgeError::InvalidAmount);
        require!(
            request.source_chain == self.source_chain && request.asset == self.asset,
            BridgeError::AssetMismatch
        );

        require!(
            request.dest_chain == ctx.chain_id,
            BridgeError::ChainBindingMismatch
        );
        verify_quorum(request, signed, ctx.committee_set)?;

        let attestation = ctx.attestation;
        require!(
            attestation.source_chain == self.source_chain && attestation.asset == self.asset,
            BridgeError::AssetMismatch
        );
        attestation.require_fresh(ctx.now, ctx.max_staleness_secs)?;
        require!(
            attestation.version == request.attestation_version,
            BridgeError::AttestationVersionMismatch
        );

        let minted_after = self
            .minted_total
            .checked_add(request.amount)
            .ok_or(BridgeError::ArithmeticOverflow)?;
        require!(
            minted_after <= self.mintable_backing(attestation),
            BridgeError::BackingExceeded
        );

        Ok(())
    }

    /// Consume the nonce and account for the mint; call only after
    /// `authorize_mint`
    pub fn commit_mint(
        &mut self,
        record: &mut MintRecord,
        request: &MintAuthorization,
        now: i64,
    ) -> Result<()> {
        self.minted_total = self
            .minted_total
            .checked_add(request.amount)
            .ok_or(BridgeError::ArithmeticOverflow)?;
        self.mints_processed = self.mints_processed.saturating_add(1);

        record.nonce = request.nonce;
        record.source_chain = request.source_chain;
        record.dest_chain = request.dest_chain;
        record.asset = request.asset;
        record.amount = request.amount;
        record.recipient = request.recipient;
        record.attestation_version = request.attestation_version;
        record.consumed = true;
        record.processed_at = now;
        Ok(())
    }

    /// Check a burn proof and open the withdraw claim it pays for.
    /// Returns the allocated withdraw id.
    pub fn open_withdraw(
        &mut self,
        chain_id: u64,
        proof: &BurnProof,
        recipient: Pubkey,
        now: i64,
        claim: &mut WithdrawClaim,
    ) -> Result<u64> {
        require!(proof.amount > 0, BridgeError::InvalidAmount);
        require!(proof.mint == self.wrapped_mint, BridgeError::AssetMismatch);
        require!(proof.is_exact(), BridgeError::BurnProofMismatch);

        let minted_total = self
            .minted_total
            .checked_sub(proof.amount)
            .ok_or(BridgeError::BurnProofMismatch)?;
        let withdraw_id = self.next_withdraw_id;
        let next_withdraw_id = withdraw_id
            .checked_add(1)
            .ok_or(BridgeError::ArithmeticOverflow)?;

        self.minted_total = minted_total;
        self.next_withdraw_id = next_withdraw_id;
        self.withdraws_opened = self.withdraws_opened.saturating_add(1);

        claim.withdraw_id = withdraw_id;
        claim.dest_chain = chain_id;
        claim.source_chain = self.source_chain;
        claim.asset = self.asset;
        claim.amount = proof.amount;
        claim.burner = proof.burner;
        claim.recipient = recipient;
        claim.created_at = now;
        claim.claimed = false;

        Ok(withdraw_id)
    }
}

/// Consumed mint nonce
///
/// Seeds: ["mint_record", source_chain, dest_chain, asset, nonce]
///
/// The account is created the first time a nonce is presented. It is only
/// marked consumed inside a successful mint; a failed mint reverts its
/// creation along with everything else.
#[account]
#[derive(InitSpace)]
pub struct MintRecord {
    pub nonce: u64,
    pub source_chain: u64,
    pub dest_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
    pub attestation_version: u64,
    pub consumed: bool,
    pub processed_at: i64,
    pub bump: u8,
}

impl MintRecord {
    pub const SEED_PREFIX: &'static [u8] = b"mint_record";
}

/// Pending or settled release request for collateral on `source_chain`
///
/// Seeds: ["withdraw_claim", source_chain, asset, withdraw_id]
#[account]
#[derive(InitSpace)]
pub struct WithdrawClaim {
    pub withdraw_id: u64,
    /// This chain, where the wrapped supply was burned
    pub dest_chain: u64,
    pub source_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub burner: Pubkey,
    /// Receives the released collateral on `source_chain`
    pub recipient: Pubkey,
    pub created_at: i64,
    pub claimed: bool,
    pub settled_at: i64,
    pub bump: u8,
}

impl WithdrawClaim {
    pub const SEED_PREFIX: &'static [u8] = b"withdraw_claim";

    /// open -> claimed, once, on a committee-signed settlement that matches
    /// the burn exactly
    pub fn authorize_settlement(
        &self,
        chain_id: u64,
        settlement: &SettlementAuthorization,
        signed: &[SignedMessage],
        committee_set: &CommitteeSet,
    ) -> Result<()> {
        require!(!self.claimed, BridgeError::AlreadyClaimed);
        require!(
            settlement.dest_chain == chain_id,
            BridgeError::ChainBindingMismatch
        );
        require!(
            settlement.source_chain == self.source_chain && settlement.asset == self.asset,
            BridgeError::AssetMismatch
        );
        require!(
            settlement.withdraw_id == self.withdraw_id && settlement.amount == self.amount,
            BridgeError::BurnProofMismatch
        );

        verify_quorum(settlement, signed, committee_set)?;
        Ok(())
    }

    pub fn settle(&mut self, now: i64) {
        self.claimed = true;
        self.settled_at = now;
    }
}
