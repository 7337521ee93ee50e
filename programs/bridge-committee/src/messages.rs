use anchor_lang::prelude::*;

use crate::errors::BridgeError;
use crate::state::BackingFact;
use crate::DOMAIN_SEPARATOR;

/// A payload the committee signs.
///
/// Signing bytes are `DOMAIN_SEPARATOR || TAG || borsh(payload)`. The tag
/// separates payload kinds; `bound_chain` is the ledger that consumes the
/// payload and is always part of the serialized body.
pub trait SignedPayload: AnchorSerialize + AnchorDeserialize + Sized {
    const TAG: &'static [u8];

    fn bound_chain(&self) -> u64;

    fn signing_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(DOMAIN_SEPARATOR.len() + Self::TAG.len() + 128);
        bytes.extend_from_slice(DOMAIN_SEPARATOR.as_bytes());
        bytes.extend_from_slice(Self::TAG);
        self.serialize(&mut bytes)
            .map_err(|_| error!(BridgeError::PayloadSerialization))?;
        Ok(bytes)
    }

    /// Inverse of `signing_bytes`; `None` for any other payload kind.
    fn from_signing_bytes(bytes: &[u8]) -> Option<Self> {
        let body = bytes
            .strip_prefix(DOMAIN_SEPARATOR.as_bytes())?
            .strip_prefix(Self::TAG)?;
        Self::try_from_slice(body).ok()
    }
}

/// Backing fact addressed to the attestation store on `store_chain`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AttestationPayload {
    pub store_chain: u64,
    pub fact: BackingFact,
}

impl SignedPayload for AttestationPayload {
    const TAG: &'static [u8] = b"attest:";

    fn bound_chain(&self) -> u64 {
        self.store_chain
    }
}

/// Mint request; signed over as-is, so `dest_chain` is always covered
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MintAuthorization {
    pub nonce: u64,
    pub source_chain: u64,
    pub dest_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
    pub attestation_version: u64,
}

impl SignedPayload for MintAuthorization {
    const TAG: &'static [u8] = b"mint:";

    fn bound_chain(&self) -> u64 {
        self.dest_chain
    }
}

/// Release of vault collateral on `source_chain` for a burn on `dest_chain`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReleaseAuthorization {
    pub withdraw_id: u64,
    pub dest_chain: u64,
    pub source_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
}

impl SignedPayload for ReleaseAuthorization {
    const TAG: &'static [u8] = b"release:";

    /// The releasing vault's chain
    fn bound_chain(&self) -> u64 {
        self.source_chain
    }
}

/// Committee confirmation, delivered to `dest_chain`, that the vault on
/// `source_chain` released the claim
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SettlementAuthorization {
    pub withdraw_id: u64,
    pub dest_chain: u64,
    pub source_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
}

impl SignedPayload for SettlementAuthorization {
    const TAG: &'static [u8] = b"settle:";

    fn bound_chain(&self) -> u64 {
        self.dest_chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint_request(dest_chain: u64) -> MintAuthorization {
        MintAuthorization {
            nonce: 7,
            source_chain: 1,
            dest_chain,
            asset: Pubkey::new_unique(),
            amount: 1_000,
            recipient: Pubkey::new_unique(),
            attestation_version: 1,
        }
    }

    #[test]
    fn test_signing_bytes_bind_destination_chain() {
        let to_b = mint_request(2);
        let mut to_c = to_b.clone();
        to_c.dest_chain = 3;

        assert_ne!(to_b.signing_bytes().unwrap(), to_c.signing_bytes().unwrap());
    }

    #[test]
    fn test_signing_bytes_decode() {
        let request = mint_request(2);
        let bytes = request.signing_bytes().unwrap();

        assert!(bytes.starts_with(DOMAIN_SEPARATOR.as_bytes()));
        assert_eq!(MintAuthorization::from_signing_bytes(&bytes), Some(request));
    }

    #[test]
    fn test_payload_kinds_do_not_cross_decode() {
        let release = ReleaseAuthorization {
            withdraw_id: 1,
            dest_chain: 2,
            source_chain: 1,
            asset: Pubkey::new_unique(),
            amount: 10,
            recipient: Pubkey::new_unique(),
        };
        let bytes = release.signing_bytes().unwrap();

        assert!(MintAuthorization::from_signing_bytes(&bytes).is_none());
        assert!(SettlementAuthorization::from_signing_bytes(&bytes).is_none());
        assert_eq!(ReleaseAuthorization::from_signing_bytes(&bytes), Some(release));
    }
}
