use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;
use bridge_committee::verification::verify_quorum;
use bridge_committee::{BridgeError, CommitteeSet, ReleaseAuthorization, SignedMessage};

use crate::DOMAIN_SEPARATOR;

/// Vault program configuration for this chain
#[account]
#[derive(InitSpace)]
pub struct VaultConfig {
    pub admin: Pubkey,

    /// Copied from the committee's AttestorConfig at initialization
    pub chain_id: u64,

    pub bump: u8,
}

/// Custody account bookkeeping for one asset on this chain
///
/// Seeds: ["asset_vault", asset]
///
/// `locked_total - released_total` is the collateral currently backing
/// claims elsewhere. Both totals only grow, and only through `lock` and
/// `release`.
#[account]
#[derive(InitSpace)]
pub struct AssetVault {
    /// Asset mint on this chain (the bridge-wide asset identifier)
    pub asset: Pubkey,

    /// Token account holding locked collateral, owned by this PDA
    pub custody: Pubkey,

    pub locked_total: u64,

    pub released_total: u64,

    /// Next deposit sequence number
    pub lock_sequence: u64,

    pub bump: u8,
}

/// What `lock` hands back to the caller and the committee
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DepositHandle {
    pub sequence: u64,
    pub record_hash: [u8; 32],
}

impl AssetVault {
    pub const SEED_PREFIX: &'static [u8] = b"asset_vault";

    /// Collateral still locked; never negative
    pub fn outstanding(&self) -> u64 {
        self.locked_total.saturating_sub(self.released_total)
    }

    /// Account for a deposit and allocate its sequence number
    pub fn record_lock(&mut self, chain_id: u64, locker: &Pubkey, amount: u64) -> Result<DepositHandle> {
        require!(amount > 0, BridgeError::InvalidAmount);

        let sequence = self.lock_sequence;
        let locked_total = self
            .locked_total
            .checked_add(amount)
            .ok_or(BridgeError::ArithmeticOverflow)?;
        let lock_sequence = sequence
            .checked_add(1)
            .ok_or(BridgeError::ArithmeticOverflow)?;

        self.locked_total = locked_total;
        self.lock_sequence = lock_sequence;

        Ok(DepositHandle {
            sequence,
            record_hash: deposit_record_hash(chain_id, &self.asset, amount, locker, sequence),
        })
    }

    /// Every check `release` needs, in order, with no mutation:
    /// (a) committee quorum over a payload bound to this vault's chain,
    /// (b) receipt not yet claimed,
    /// (c) enough outstanding collateral.
    pub fn authorize_release(
        &self,
        chain_id: u64,
        receipt: &ReleaseReceipt,
        claim: &ReleaseAuthorization,
        signed: &[SignedMessage],
        committee_set: &CommitteeSet,
    ) -> Result<()> {
        require!(claim.amount > 0, BridgeError::InvalidAmount);
        require!(claim.asset == self.asset, BridgeError::AssetMismatch);
        require!(
            claim.source_chain == chain_id,
            BridgeError::ChainBindingMismatch
        );

        verify_quorum(claim, signed, committee_set)?;

        require!(!receipt.claimed, BridgeError::AlreadyClaimed);
        require!(
            self.outstanding() >= claim.amount,
            BridgeError::InsufficientLockedBalance
        );
        Ok(())
    }

    /// Mark the claim released; call only after `authorize_release`
    pub fn commit_release(
        &mut self,
        receipt: &mut ReleaseReceipt,
        claim: &ReleaseAuthorization,
        now: i64,
    ) -> Result<()> {
        self.released_total = self
            .released_total
            .checked_add(claim.amount)
            .ok_or(BridgeError::ArithmeticOverflow)?;

        receipt.withdraw_id = claim.withdraw_id;
        receipt.dest_chain = claim.dest_chain;
        receipt.source_chain = claim.source_chain;
        receipt.asset = claim.asset;
        receipt.amount = claim.amount;
        receipt.recipient = claim.recipient;
        receipt.claimed = true;
        receipt.released_at = now;
        Ok(())
    }
}

/// keccak256(domain || chain || asset || amount || locker || sequence)
///
/// The committee attests to these records, never to user-supplied claims.
pub fn deposit_record_hash(
    chain_id: u64,
    asset: &Pubkey,
    amount: u64,
    locker: &Pubkey,
    sequence: u64,
) -> [u8; 32] {
    let mut hash_data = Vec::with_capacity(DOMAIN_SEPARATOR.len() + 8 + 32 + 8 + 32 + 8);
    hash_data.extend_from_slice(DOMAIN_SEPARATOR.as_bytes());
    hash_data.extend_from_slice(&chain_id.to_le_bytes());
    hash_data.extend_from_slice(asset.as_ref());
    hash_data.extend_from_slice(&amount.to_le_bytes());
    hash_data.extend_from_slice(locker.as_ref());
    hash_data.extend_from_slice(&sequence.to_le_bytes());

    keccak::hash(&hash_data).to_bytes()
}

/// Individual deposit with hash for committee observation
///
/// Seeds: ["deposit", asset, sequence]
#[account]
#[derive(InitSpace)]
pub struct DepositRecord {
    pub chain_id: u64,
    pub asset: Pubkey,
    pub locker: Pubkey,
    pub amount: u64,
    pub sequence: u64,
    pub locked_at: i64,
    pub record_hash: [u8; 32],
    pub bump: u8,
}

/// Release side of a withdraw claim
///
/// Seeds: ["release_receipt", asset, dest_chain, withdraw_id]
///
/// Created on the first successful release. A failed release reverts the
/// whole transaction, so the claim stays open and can be retried with the
/// same withdraw_id.
#[account]
#[derive(InitSpace)]
pub struct ReleaseReceipt {
    pub withdraw_id: u64,
    pub dest_chain: u64,
    pub source_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
    pub claimed: bool,
    pub released_at: i64,
    pub bump: u8,
}

impl ReleaseReceipt {
    pub const SEED_PREFIX: &'static [u8] = b"release_receipt";
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_committee::test_utils::error_code;
    use bridge_committee::SignedPayload;

    const CHAIN_A: u64 = 1;
    const CHAIN_B: u64 = 2;

    fn vault() -> AssetVault {
        AssetVault {
            asset: Pubkey::new_from_array([3u8; 32]),
            custody: Pubkey::new_unique(),
            locked_total: 0,
            released_total: 0,
            lock_sequence: 0,
            bump: 255,
        }
    }

    fn committee() -> CommitteeSet {
        CommitteeSet {
            version: 1,
            signers: (0..3).map(|_| Pubkey::new_unique()).collect(),
            threshold: 2,
            max_size: 5,
            bump: 255,
        }
    }

    fn open_receipt() -> ReleaseReceipt {
        ReleaseReceipt {
            withdraw_id: 0,
            dest_chain: 0,
            source_chain: 0,
            asset: Pubkey::default(),
            amount: 0,
            recipient: Pubkey::default(),
            claimed: false,
            released_at: 0,
            bump: 0,
        }
    }

    fn claim(vault: &AssetVault, amount: u64) -> ReleaseAuthorization {
        ReleaseAuthorization {
            withdraw_id: 1,
            dest_chain: CHAIN_B,
            source_chain: CHAIN_A,
            asset: vault.asset,
            amount,
            recipient: Pubkey::new_unique(),
        }
    }

    fn sign(signers: &[Pubkey], claim: &ReleaseAuthorization) -> Vec<SignedMessage> {
        let message = claim.signing_bytes().unwrap();
        signers
            .iter()
            .map(|signer| SignedMessage {
                signer: *signer,
                message: message.clone(),
            })
            .collect()
    }

    #[test]
    fn test_record_lock_allocates_sequence() {
        let mut vault = vault();
        let locker = Pubkey::new_unique();

        let first = vault.record_lock(CHAIN_A, &locker, 600).unwrap();
        let second = vault.record_lock(CHAIN_A, &locker, 400).unwrap();

        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_eq!(vault.locked_total, 1_000);
        assert_eq!(vault.lock_sequence, 2);
        assert_ne!(first.record_hash, second.record_hash);
    }

    #[test]
    fn test_record_lock_rejects_zero() {
        let mut vault = vault();
        let err = vault.record_lock(CHAIN_A, &Pubkey::new_unique(), 0).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::InvalidAmount));
        assert_eq!(vault.lock_sequence, 0);
    }

    #[test]
    fn test_deposit_hash_binds_chain() {
        let asset = Pubkey::new_unique();
        let locker = Pubkey::new_unique();
        assert_ne!(
            deposit_record_hash(CHAIN_A, &asset, 10, &locker, 0),
            deposit_record_hash(CHAIN_B, &asset, 10, &locker, 0)
        );
    }

    #[test]
    fn test_release_happy_path_then_already_claimed() {
        let (mut vault, committee) = (vault(), committee());
        vault.record_lock(CHAIN_A, &Pubkey::new_unique(), 1_000).unwrap();

        let claim = claim(&vault, 1_000);
        let signed = sign(&committee.signers[..2], &claim);
        let mut receipt = open_receipt();

        vault
            .authorize_release(CHAIN_A, &receipt, &claim, &signed, &committee)
            .unwrap();
        vault.commit_release(&mut receipt, &claim, 50).unwrap();

        assert!(receipt.claimed);
        assert_eq!(vault.outstanding(), 0);

        let before = (vault.locked_total, vault.released_total);
        let err = vault
            .authorize_release(CHAIN_A, &receipt, &claim, &signed, &committee)
            .unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::AlreadyClaimed));
        assert_eq!((vault.locked_total, vault.released_total), before);
    }

    #[test]
    fn test_failed_release_can_be_retried() {
        let (mut vault, committee) = (vault(), committee());
        vault.record_lock(CHAIN_A, &Pubkey::new_unique(), 1_000).unwrap();

        let claim = claim(&vault, 1_000);
        let receipt = open_receipt();

        let short = sign(&committee.signers[..1], &claim);
        let err = vault
            .authorize_release(CHAIN_A, &receipt, &claim, &short, &committee)
            .unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::SignatureThresholdNotMet)
        );
        assert!(!receipt.claimed);
        assert_eq!((vault.locked_total, vault.released_total), (1_000, 0));

        // Same withdraw_id, now with quorum
        let mut receipt = receipt;
        let signed = sign(&committee.signers[..2], &claim);
        vault
            .authorize_release(CHAIN_A, &receipt, &claim, &signed, &committee)
            .unwrap();
        vault.commit_release(&mut receipt, &claim, 60).unwrap();

        assert!(receipt.claimed);
        assert_eq!(receipt.withdraw_id, claim.withdraw_id);
        assert_eq!(vault.outstanding(), 0);
    }

    #[test]
    fn test_release_bound_to_other_vault_chain() {
        let (mut vault, committee) = (vault(), committee());
        vault.record_lock(CHAIN_A, &Pubkey::new_unique(), 1_000).unwrap();

        // Signed for a vault on chain 9, presented to the vault on chain A
        let mut foreign = claim(&vault, 500);
        foreign.source_chain = 9;
        let signed = sign(&committee.signers, &foreign);

        let err = vault
            .authorize_release(CHAIN_A, &open_receipt(), &foreign, &signed, &committee)
            .unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::ChainBindingMismatch));

        let mut relabelled = foreign.clone();
        relabelled.source_chain = CHAIN_A;
        let err = vault
            .authorize_release(CHAIN_A, &open_receipt(), &relabelled, &signed, &committee)
            .unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::ChainBindingMismatch));
    }

    #[test]
    fn test_release_insufficient_locked_balance() {
        let (mut vault, committee) = (vault(), committee());
        vault.record_lock(CHAIN_A, &Pubkey::new_unique(), 100).unwrap();

        let claim = claim(&vault, 101);
        let signed = sign(&committee.signers, &claim);
        let err = vault
            .authorize_release(CHAIN_A, &open_receipt(), &claim, &signed, &committee)
            .unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::InsufficientLockedBalance)
        );
    }

    #[test]
    fn test_release_threshold_not_met() {
        let (mut vault, committee) = (vault(), committee());
        vault.record_lock(CHAIN_A, &Pubkey::new_unique(), 100).unwrap();

        let claim = claim(&vault, 100);
        let signed = sign(&committee.signers[..1], &claim);
        let err = vault
            .authorize_release(CHAIN_A, &open_receipt(), &claim, &signed, &committee)
            .unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::SignatureThresholdNotMet)
        );
    }
}
