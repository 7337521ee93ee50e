use anchor_lang::prelude::*;

/// Error taxonomy shared by every bridge program.
///
/// The vault and mint programs return these codes directly so that an
/// operator sees the same number for the same violated invariant on every
/// chain.
#[error_code]
pub enum BridgeError {
    #[msg("Nonce already consumed for this chain pair and asset (replay)")]
    ReplayedNonce,

    #[msg("Fewer distinct committee signatures than the threshold")]
    SignatureThresholdNotMet,

    #[msg("Signed payload is bound to a different chain")]
    ChainBindingMismatch,

    #[msg("Backing attestation is stale or absent - refresh required")]
    StaleAttestation,

    #[msg("Mint would exceed attested backing minus safety margin")]
    BackingExceeded,

    #[msg("Vault outstanding collateral is smaller than the release amount")]
    InsufficientLockedBalance,

    #[msg("Withdraw claim already settled")]
    AlreadyClaimed,

    #[msg("Invalid threshold - must be >= 1 and <= signer count")]
    InvalidThreshold,

    #[msg("Committee is at maximum size")]
    CapacityExceeded,

    #[msg("Signer is not a member of the current committee")]
    UnknownSigner,

    #[msg("Signer is already a member of the committee")]
    DuplicateSigner,

    #[msg("Attestation version must be strictly greater than the stored version")]
    AttestationVersionNotIncreasing,

    #[msg("Attestation observed_at is beyond the clock skew tolerance")]
    FutureObservation,

    #[msg("Request references an attestation version that is not the stored one")]
    AttestationVersionMismatch,

    #[msg("Source chain or asset does not match the target account")]
    AssetMismatch,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Burn proof does not show the requested supply decrease")]
    BurnProofMismatch,

    #[msg("Invalid Ed25519 instruction format or offsets")]
    InvalidEd25519Instruction,

    #[msg("Signer is not the configured admin")]
    Unauthorized,

    #[msg("Invalid committee configuration")]
    InvalidCommitteeConfig,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Failed to serialize signed payload")]
    PayloadSerialization,
}
