use anchor_lang::error::Error;

/// Numeric code of an Anchor error, for comparing against `u32::from(BridgeError::X)`
pub fn error_code(err: Error) -> u32 {
    match err {
        Error::AnchorError(e) => e.error_code_number,
        Error::ProgramError(e) => panic!("expected an Anchor error, got {e:?}"),
    }
}
