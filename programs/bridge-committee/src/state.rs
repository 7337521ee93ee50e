use anchor_lang::prelude::*;
use sha2::{Digest, Sha256};

use crate::config::MAX_COMMITTEE_SIZE;
use crate::errors::BridgeError;

/// Chain-local configuration of the attestation layer.
///
/// `chain_id` is the identifier of the ledger this program runs on. It is
/// bound into every attestation payload accepted here, so a fact signed
/// for one chain's store cannot be replayed into another's.
#[account]
#[derive(InitSpace)]
pub struct AttestorConfig {
    /// Governance key allowed to change the committee and staleness bounds
    pub admin: Pubkey,

    /// Identifier of the chain hosting this program
    pub chain_id: u64,

    /// A stored fact older than this (seconds) cannot back new mints
    pub max_staleness_secs: i64,

    /// How far in the future `observed_at` may be before it is rejected
    pub clock_skew_secs: i64,

    pub bump: u8,
}

impl AttestorConfig {
    pub fn validate_bounds(max_staleness_secs: i64, clock_skew_secs: i64) -> Result<()> {
        require!(max_staleness_secs > 0, BridgeError::InvalidCommitteeConfig);
        require!(clock_skew_secs >= 0, BridgeError::InvalidCommitteeConfig);
        Ok(())
    }
}

/// Attestor committee (the threshold signer set)
///
/// `signers` is the enumerable set itself: a removed signer is excised,
/// never flagged, so the vector is always exactly the active committee.
/// Every mutation bumps `version`.
#[account]
#[derive(InitSpace)]
pub struct CommitteeSet {
    /// Monotonically increasing, starts at 1
    pub version: u64,

    /// Ordered set of attestor identities
    #[max_len(16)]
    pub signers: Vec<Pubkey>,

    /// Distinct signatures required
    pub threshold: u8,

    /// Policy bound on `signers.len()`, at most MAX_COMMITTEE_SIZE
    pub max_size: u8,

    pub bump: u8,
}

impl CommitteeSet {
    /// Check `1 <= threshold <= |signers| <= max_size <= MAX_COMMITTEE_SIZE`
    /// and that no identity is zero or repeated.
    pub fn validate_membership(signers: &[Pubkey], threshold: u8, max_size: u8) -> Result<()> {
        require!(
            max_size as usize <= MAX_COMMITTEE_SIZE && max_size > 0,
            BridgeError::InvalidCommitteeConfig
        );
        require!(
            signers.len() <= max_size as usize,
            BridgeError::CapacityExceeded
        );
        require!(
            threshold >= 1 && threshold as usize <= signers.len(),
            BridgeError::InvalidThreshold
        );

        for (i, signer) in signers.iter().enumerate() {
            require!(*signer != Pubkey::default(), BridgeError::UnknownSigner);
            require!(
                !signers[..i].contains(signer),
                BridgeError::DuplicateSigner
            );
        }

        Ok(())
    }

    pub fn contains(&self, signer: &Pubkey) -> bool {
        self.signers.contains(signer)
    }

    pub fn add_signer(&mut self, signer: Pubkey) -> Result<()> {
        require!(signer != Pubkey::default(), BridgeError::UnknownSigner);
        require!(!self.contains(&signer), BridgeError::DuplicateSigner);
        require!(
            self.signers.len() < self.max_size as usize,
            BridgeError::CapacityExceeded
        );

        self.signers.push(signer);
        self.bump_version()
    }

    /// Remove by swap-and-pop. Refuses to drop below the threshold; lower
    /// the threshold first.
    pub fn remove_signer(&mut self, signer: &Pubkey) -> Result<()> {
        let index = self
            .signers
            .iter()
            .position(|s| s == signer)
            .ok_or(BridgeError::UnknownSigner)?;

        require!(
            self.signers.len() > self.threshold as usize,
            BridgeError::InvalidThreshold
        );

        self.signers.swap_remove(index);
        self.bump_version()
    }

    pub fn set_threshold(&mut self, threshold: u8) -> Result<()> {
        require!(
            threshold >= 1 && threshold as usize <= self.signers.len(),
            BridgeError::InvalidThreshold
        );

        self.threshold = threshold;
        self.bump_version()
    }

    pub fn current_set(&self) -> CommitteeSnapshot {
        CommitteeSnapshot {
            signers: self.signers.clone(),
            threshold: self.threshold,
            version: self.version,
        }
    }

    /// sha256(version || threshold || signers), in stored order
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update([self.threshold]);
        for signer in &self.signers {
            hasher.update(signer.as_ref());
        }
        hasher.finalize().into()
    }

    fn bump_version(&mut self) -> Result<()> {
        self.version = self
            .version
            .checked_add(1)
            .ok_or(BridgeError::ArithmeticOverflow)?;
        Ok(())
    }
}

/// Read view of the committee returned by `current_set`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CommitteeSnapshot {
    pub signers: Vec<Pubkey>,
    pub threshold: u8,
    pub version: u64,
}

/// Backing fact as published by the committee
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BackingFact {
    pub source_chain: u64,
    pub asset: Pubkey,
    pub backing_amount: u64,
    /// Unix seconds at which the committee observed the locked total
    pub observed_at: i64,
    pub version: u64,
}

/// Latest backing fact for one (source_chain, asset)
///
/// Seeds: ["backing_attestation", source_chain, asset]
///
/// A freshly created account has `version == 0` and is never usable.
#[account]
#[derive(InitSpace, Debug)]
pub struct BackingAttestation {
    pub source_chain: u64,
    pub asset: Pubkey,
    pub backing_amount: u64,
    pub observed_at: i64,
    pub version: u64,
    pub bump: u8,
}

impl BackingAttestation {
    pub const SEED_PREFIX: &'static [u8] = b"backing_attestation";

    pub fn fact(&self) -> BackingFact {
        BackingFact {
            source_chain: self.source_chain,
            asset: self.asset,
            backing_amount: self.backing_amount,
            observed_at: self.observed_at,
            version: self.version,
        }
    }

    /// Replace the stored fact with `fact`. Never merges.
    pub fn supersede(&mut self, fact: &BackingFact, now: i64, clock_skew_secs: i64) -> Result<()> {
        Self::check_successor(self.version, fact, now, clock_skew_secs)?;

        self.source_chain = fact.source_chain;
        self.asset = fact.asset;
        self.backing_amount = fact.backing_amount;
        self.observed_at = fact.observed_at;
        self.version = fact.version;
        Ok(())
    }

    pub fn check_successor(
        stored_version: u64,
        fact: &BackingFact,
        now: i64,
        clock_skew_secs: i64,
    ) -> Result<()> {
        require!(
            fact.version > stored_version,
            BridgeError::AttestationVersionNotIncreasing
        );
        require!(
            fact.observed_at <= now.saturating_add(clock_skew_secs),
            BridgeError::FutureObservation
        );
        Ok(())
    }

    /// `now - observed_at > max_staleness_secs`, or nothing stored yet
    pub fn is_stale(&self, now: i64, max_staleness_secs: i64) -> bool {
        self.version == 0 || now.saturating_sub(self.observed_at) > max_staleness_secs
    }

    /// Fail closed: a stale or empty fact is an error, never a pass.
    pub fn require_fresh(&self, now: i64, max_staleness_secs: i64) -> Result<()> {
        require!(
            !self.is_stale(now, max_staleness_secs),
            BridgeError::StaleAttestation
        );
        Ok(())
    }

    pub fn latest(&self, now: i64, max_staleness_secs: i64) -> LatestAttestation {
        LatestAttestation {
            fact: self.fact(),
            is_stale: self.is_stale(now, max_staleness_secs),
        }
    }

    /// Version-0 store for a (source_chain, asset) that has no account yet
    pub fn empty(source_chain: u64, asset: Pubkey) -> Self {
        Self {
            source_chain,
            asset,
            backing_amount: 0,
            observed_at: 0,
            version: 0,
            bump: 0,
        }
    }

    /// Read the store behind its PDA, which callers have already checked.
    ///
    /// An account that was never created (system-owned, no data) reads as
    /// `empty`, so consumers reject it as stale instead of failing account
    /// loading. Anything else must be a store owned by this program for the
    /// same (source_chain, asset).
    pub fn load_or_empty(
        owner: &Pubkey,
        data: &[u8],
        source_chain: u64,
        asset: Pubkey,
    ) -> Result<Self> {
        if data.is_empty() && *owner == anchor_lang::system_program::ID {
            return Ok(Self::empty(source_chain, asset));
        }

        require_keys_eq!(
            *owner,
            crate::ID,
            anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram
        );
        let stored = Self::try_deserialize(&mut &data[..])?;
        require!(
            stored.source_chain == source_chain && stored.asset == asset,
            BridgeError::AssetMismatch
        );
        Ok(stored)
    }

    pub fn from_account_info(info: &AccountInfo, source_chain: u64, asset: Pubkey) -> Result<Self> {
        let data = info.try_borrow_data()?;
        Self::load_or_empty(info.owner, &data, source_chain, asset)
    }
}

/// Return value of `latest_attestation`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct LatestAttestation {
    pub fact: BackingFact,
    pub is_stale: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::error_code;

    fn committee(n: usize, threshold: u8, max_size: u8) -> CommitteeSet {
        CommitteeSet {
            version: 1,
            signers: (0..n).map(|_| Pubkey::new_unique()).collect(),
            threshold,
            max_size,
            bump: 255,
        }
    }

    fn stored(version: u64, observed_at: i64) -> BackingAttestation {
        BackingAttestation {
            source_chain: 1,
            asset: Pubkey::new_unique(),
            backing_amount: 1_000,
            observed_at,
            version,
            bump: 255,
        }
    }

    #[test]
    fn test_validate_membership_bounds() {
        let signers: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();

        assert!(CommitteeSet::validate_membership(&signers, 2, 5).is_ok());
        assert_eq!(
            error_code(CommitteeSet::validate_membership(&signers, 0, 5).unwrap_err()),
            u32::from(BridgeError::InvalidThreshold)
        );
        assert_eq!(
            error_code(CommitteeSet::validate_membership(&signers, 4, 5).unwrap_err()),
            u32::from(BridgeError::InvalidThreshold)
        );
        assert_eq!(
            error_code(CommitteeSet::validate_membership(&signers, 2, 2).unwrap_err()),
            u32::from(BridgeError::CapacityExceeded)
        );

        let duplicated = vec![signers[0], signers[1], signers[0]];
        assert_eq!(
            error_code(CommitteeSet::validate_membership(&duplicated, 2, 5).unwrap_err()),
            u32::from(BridgeError::DuplicateSigner)
        );
    }

    #[test]
    fn test_add_signer_capacity() {
        let mut set = committee(2, 1, 3);
        set.add_signer(Pubkey::new_unique()).unwrap();
        assert_eq!(set.signers.len(), 3);
        assert_eq!(set.version, 2);

        let err = set.add_signer(Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::CapacityExceeded));
        assert_eq!(set.signers.len(), 3);
        assert_eq!(set.version, 2);
    }

    #[test]
    fn test_add_signer_rejects_zero_and_duplicate() {
        let mut set = committee(2, 1, 5);
        let existing = set.signers[0];

        assert_eq!(
            error_code(set.add_signer(Pubkey::default()).unwrap_err()),
            u32::from(BridgeError::UnknownSigner)
        );
        assert_eq!(
            error_code(set.add_signer(existing).unwrap_err()),
            u32::from(BridgeError::DuplicateSigner)
        );
    }

    #[test]
    fn test_remove_signer_excises_entry() {
        let mut set = committee(4, 2, 5);
        let removed = set.signers[1];
        let last = set.signers[3];

        set.remove_signer(&removed).unwrap();

        let snapshot = set.current_set();
        assert_eq!(snapshot.signers.len(), 3);
        assert!(!snapshot.signers.contains(&removed));
        // swap-and-pop moves the tail into the hole
        assert_eq!(snapshot.signers[1], last);
        assert_eq!(snapshot.version, 2);
    }

    #[test]
    fn test_remove_signer_keeps_threshold_reachable() {
        let mut set = committee(2, 2, 5);
        let victim = set.signers[0];

        let err = set.remove_signer(&victim).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::InvalidThreshold));
        assert_eq!(set.signers.len(), 2);

        let err = set.remove_signer(&Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::UnknownSigner));
    }

    #[test]
    fn test_set_threshold_bounds() {
        let mut set = committee(3, 2, 5);

        assert_eq!(
            error_code(set.set_threshold(0).unwrap_err()),
            u32::from(BridgeError::InvalidThreshold)
        );
        assert_eq!(
            error_code(set.set_threshold(4).unwrap_err()),
            u32::from(BridgeError::InvalidThreshold)
        );
        set.set_threshold(3).unwrap();
        assert_eq!(set.threshold, 3);
    }

    #[test]
    fn test_digest_tracks_membership() {
        let mut set = committee(3, 2, 5);
        let before = set.digest();
        assert_eq!(before, set.digest());

        set.add_signer(Pubkey::new_unique()).unwrap();
        assert_ne!(before, set.digest());
    }

    #[test]
    fn test_supersede_requires_higher_version() {
        let mut attestation = stored(3, 1_000);
        let mut fact = attestation.fact();
        fact.backing_amount = 5_000;

        fact.version = 3;
        let err = attestation.supersede(&fact, 1_000, 30).unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::AttestationVersionNotIncreasing)
        );

        fact.version = 2;
        assert!(attestation.supersede(&fact, 1_000, 30).is_err());
        assert_eq!(attestation.backing_amount, 1_000);

        fact.version = 4;
        attestation.supersede(&fact, 1_000, 30).unwrap();
        assert_eq!(attestation.backing_amount, 5_000);
        assert_eq!(attestation.version, 4);
    }

    #[test]
    fn test_supersede_rejects_future_observation() {
        let mut attestation = stored(0, 0);
        let mut fact = attestation.fact();
        fact.version = 1;

        fact.observed_at = 1_030;
        attestation.supersede(&fact, 1_000, 30).unwrap();

        fact.version = 2;
        fact.observed_at = 1_031;
        let err = attestation.supersede(&fact, 1_000, 30).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::FutureObservation));
        assert_eq!(attestation.version, 1);
    }

    #[test]
    fn test_staleness_boundary() {
        let attestation = stored(1, 1_000);
        let max_staleness = 600;

        assert!(!attestation.is_stale(1_600, max_staleness));
        assert!(attestation.require_fresh(1_600, max_staleness).is_ok());

        assert!(attestation.is_stale(1_601, max_staleness));
        assert_eq!(
            error_code(attestation.require_fresh(1_601, max_staleness).unwrap_err()),
            u32::from(BridgeError::StaleAttestation)
        );
    }

    #[test]
    fn test_empty_store_is_stale() {
        let attestation = stored(0, 1_000);
        assert!(attestation.is_stale(1_000, 600));
        assert!(attestation.latest(1_000, 600).is_stale);
    }

    #[test]
    fn test_missing_store_reads_as_stale_version_zero() {
        let asset = Pubkey::new_unique();
        let attestation =
            BackingAttestation::load_or_empty(&anchor_lang::system_program::ID, &[], 1, asset)
                .unwrap();

        assert_eq!(attestation.fact(), BackingAttestation::empty(1, asset).fact());
        let latest = attestation.latest(1_000, 600);
        assert_eq!(latest.fact.version, 0);
        assert!(latest.is_stale);
        assert_eq!(
            error_code(attestation.require_fresh(1_000, 600).unwrap_err()),
            u32::from(BridgeError::StaleAttestation)
        );
    }

    #[test]
    fn test_load_written_store() {
        let attestation = stored(3, 1_000);
        let mut data = Vec::new();
        attestation.try_serialize(&mut data).unwrap();

        let loaded = BackingAttestation::load_or_empty(
            &crate::ID,
            &data,
            attestation.source_chain,
            attestation.asset,
        )
        .unwrap();
        assert_eq!(loaded.fact(), attestation.fact());

        let err = BackingAttestation::load_or_empty(
            &crate::ID,
            &data,
            attestation.source_chain,
            Pubkey::new_unique(),
        )
        .unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::AssetMismatch));
    }

    #[test]
    fn test_load_rejects_foreign_owner() {
        let attestation = stored(3, 1_000);
        let mut data = Vec::new();
        attestation.try_serialize(&mut data).unwrap();

        let err = BackingAttestation::load_or_empty(
            &Pubkey::new_unique(),
            &data,
            attestation.source_chain,
            attestation.asset,
        )
        .unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram)
        );
    }
}
