use anchor_lang::prelude::*;

use crate::ed25519_utils::SignedMessage;
use crate::errors::BridgeError;
use crate::messages::SignedPayload;
use crate::state::CommitteeSet;

/// Verify that at least `threshold` distinct committee members signed
/// exactly `expected`. Returns the number of distinct signers counted.
///
/// Pure function of (payload, signed messages, committee):
/// - the zero identity and non-members fail with `UnknownSigner`;
/// - a message that decodes to the same payload kind but is bound to a
///   different chain fails with `ChainBindingMismatch`;
/// - any other message mismatch does not count;
/// - a member signing twice is counted once.
///
/// There is no branch that succeeds without reaching the threshold.
pub fn verify_quorum<P: SignedPayload>(
    expected: &P,
    signed: &[SignedMessage],
    committee: &CommitteeSet,
) -> Result<u8> {
    require!(committee.threshold >= 1, BridgeError::InvalidThreshold);

    let expected_bytes = expected.signing_bytes()?;
    let mut counted: Vec<Pubkey> = Vec::with_capacity(committee.signers.len());

    for entry in signed {
        require!(
            entry.signer != Pubkey::default() && committee.contains(&entry.signer),
            BridgeError::UnknownSigner
        );

        if entry.message != expected_bytes {
            if let Some(other) = P::from_signing_bytes(&entry.message) {
                require!(
                    other.bound_chain() == expected.bound_chain(),
                    BridgeError::ChainBindingMismatch
                );
            }
            continue;
        }

        if !counted.contains(&entry.signer) {
            counted.push(entry.signer);
        }
    }

    require!(
        counted.len() >= committee.threshold as usize,
        BridgeError::SignatureThresholdNotMet
    );

    msg!(
        "✓ Committee quorum: {}/{} (set version {})",
        counted.len(),
        committee.threshold,
        committee.version
    );

    Ok(counted.len() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MintAuthorization;
    use crate::test_utils::error_code;

    fn committee(n: usize, threshold: u8) -> CommitteeSet {
        CommitteeSet {
            version: 1,
            signers: (0..n).map(|_| Pubkey::new_unique()).collect(),
            threshold,
            max_size: 16,
            bump: 255,
        }
    }

    fn request(dest_chain: u64) -> MintAuthorization {
        MintAuthorization {
            nonce: 1,
            source_chain: 1,
            dest_chain,
            asset: Pubkey::new_unique(),
            amount: 1_000,
            recipient: Pubkey::new_unique(),
            attestation_version: 1,
        }
    }

    fn sign_by(signers: &[Pubkey], payload: &MintAuthorization) -> Vec<SignedMessage> {
        let message = payload.signing_bytes().unwrap();
        signers
            .iter()
            .map(|signer| SignedMessage {
                signer: *signer,
                message: message.clone(),
            })
            .collect()
    }

    #[test]
    fn test_threshold_boundary() {
        let set = committee(5, 3);
        let payload = request(2);

        let short = sign_by(&set.signers[..2], &payload);
        let err = verify_quorum(&payload, &short, &set).unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::SignatureThresholdNotMet)
        );

        let exact = sign_by(&set.signers[..3], &payload);
        assert_eq!(verify_quorum(&payload, &exact, &set).unwrap(), 3);
    }

    #[test]
    fn test_duplicates_counted_once() {
        let set = committee(5, 3);
        let payload = request(2);

        let mut signed = sign_by(&set.signers[..3], &payload);
        signed.extend(sign_by(&set.signers[..3], &payload));
        assert_eq!(verify_quorum(&payload, &signed, &set).unwrap(), 3);

        // t-1 members repeated many times never reach t
        let mut padded = sign_by(&set.signers[..2], &payload);
        for _ in 0..4 {
            padded.extend(sign_by(&set.signers[..1], &payload));
        }
        let err = verify_quorum(&payload, &padded, &set).unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::SignatureThresholdNotMet)
        );
    }

    #[test]
    fn test_chain_binding_mismatch() {
        let set = committee(3, 2);
        let signed_for_b = request(2);
        let signed = sign_by(&set.signers[..2], &signed_for_b);

        let mut replayed_to_c = signed_for_b.clone();
        replayed_to_c.dest_chain = 3;

        let err = verify_quorum(&replayed_to_c, &signed, &set).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::ChainBindingMismatch));
    }

    #[test]
    fn test_other_payload_does_not_count() {
        let set = committee(3, 2);
        let payload = request(2);
        let mut other = payload.clone();
        other.amount = 999;

        let mut signed = sign_by(&set.signers[..1], &payload);
        signed.extend(sign_by(&set.signers[1..2], &other));

        let err = verify_quorum(&payload, &signed, &set).unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::SignatureThresholdNotMet)
        );
    }

    #[test]
    fn test_unknown_and_zero_signers_rejected() {
        let set = committee(3, 2);
        let payload = request(2);

        let mut signed = sign_by(&set.signers[..2], &payload);
        signed.extend(sign_by(&[Pubkey::new_unique()], &payload));
        let err = verify_quorum(&payload, &signed, &set).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::UnknownSigner));

        let zero = sign_by(&[Pubkey::default()], &payload);
        let err = verify_quorum(&payload, &zero, &set).unwrap_err();
        assert_eq!(error_code(err), u32::from(BridgeError::UnknownSigner));
    }

    #[test]
    fn test_empty_signature_set_fails_closed() {
        let set = committee(3, 1);
        let err = verify_quorum(&request(2), &[], &set).unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(BridgeError::SignatureThresholdNotMet)
        );
    }
}
