pub mod initialize_committee;
pub mod update_committee;
pub mod submit_attestation;

pub use initialize_committee::*;
pub use update_committee::*;
pub use submit_attestation::*;
