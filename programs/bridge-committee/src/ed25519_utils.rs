use anchor_lang::prelude::*;
use anchor_lang::solana_program::ed25519_program;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};

use crate::errors::BridgeError;

/// Offsets header is 14 bytes per signature, after a 2 byte preamble
const PREAMBLE_LEN: usize = 2;
const OFFSETS_LEN: usize = 14;
const PUBKEY_LEN: usize = 32;
const SIGNATURE_LEN: usize = 64;

/// Instruction index meaning "data lives in this same instruction"
const CURRENT_INSTRUCTION: u16 = u16::MAX;

/// A (signer, message) pair whose signature the Ed25519 precompile has
/// already checked. The bridge programs never see the raw signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedMessage {
    pub signer: Pubkey,
    pub message: Vec<u8>,
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    let bytes = data
        .get(at..at + 2)
        .ok_or(BridgeError::InvalidEd25519Instruction)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn slice(data: &[u8], offset: u16, len: usize) -> Result<&[u8]> {
    let start = offset as usize;
    data.get(start..start + len)
        .ok_or_else(|| error!(BridgeError::InvalidEd25519Instruction))
}

/// Extract every signed message from one Ed25519 precompile instruction
///
/// Ed25519 instruction data format:
/// [0]:     num_signatures (u8)
/// [1]:     padding
/// then per signature, 7 little-endian u16 values:
///          signature_offset, signature_instruction_index,
///          public_key_offset, public_key_instruction_index,
///          message_data_offset, message_data_size, message_instruction_index
/// followed by the referenced data.
///
/// Every instruction index must be `u16::MAX`. The precompile would
/// otherwise verify bytes from a different instruction than the ones we
/// read here.
pub fn extract_ed25519_entries(ix_data: &[u8]) -> Result<Vec<SignedMessage>> {
    require!(
        ix_data.len() >= PREAMBLE_LEN,
        BridgeError::InvalidEd25519Instruction
    );

    let count = ix_data[0] as usize;
    require!(count > 0, BridgeError::InvalidEd25519Instruction);
    require!(
        ix_data.len() >= PREAMBLE_LEN + count * OFFSETS_LEN,
        BridgeError::InvalidEd25519Instruction
    );

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let base = PREAMBLE_LEN + i * OFFSETS_LEN;

        let signature_offset = read_u16(ix_data, base)?;
        let signature_ix = read_u16(ix_data, base + 2)?;
        let pubkey_offset = read_u16(ix_data, base + 4)?;
        let pubkey_ix = read_u16(ix_data, base + 6)?;
        let message_offset = read_u16(ix_data, base + 8)?;
        let message_size = read_u16(ix_data, base + 10)?;
        let message_ix = read_u16(ix_data, base + 12)?;

        require!(
            signature_ix == CURRENT_INSTRUCTION
                && pubkey_ix == CURRENT_INSTRUCTION
                && message_ix == CURRENT_INSTRUCTION,
            BridgeError::InvalidEd25519Instruction
        );

        // Present but otherwise unused: the precompile already verified it
        slice(ix_data, signature_offset, SIGNATURE_LEN)?;

        let mut pubkey_bytes = [0u8; PUBKEY_LEN];
        pubkey_bytes.copy_from_slice(slice(ix_data, pubkey_offset, PUBKEY_LEN)?);
        let message = slice(ix_data, message_offset, message_size as usize)?.to_vec();

        entries.push(SignedMessage {
            signer: Pubkey::new_from_array(pubkey_bytes),
            message,
        });
    }

    Ok(entries)
}

/// Collect the signed messages of all Ed25519 precompile instructions that
/// precede the currently executing instruction.
pub fn load_signed_messages(instructions_sysvar: &AccountInfo) -> Result<Vec<SignedMessage>> {
    let current = load_current_index_checked(instructions_sysvar)? as usize;

    let mut signed = Vec::new();
    for index in 0..current {
        let ix = load_instruction_at_checked(index, instructions_sysvar)?;
        if ix.program_id != ed25519_program::ID {
            continue;
        }
        signed.extend(extract_ed25519_entries(&ix.data)?);
    }

    msg!("   Ed25519 signed messages found: {}", signed.len());
    Ok(signed)
}

/// Build precompile instruction data with every offset pointing into the
/// instruction itself. Used by tests and by off-chain tooling that
/// assembles transactions.
///
/// Fails rather than truncate: at most 255 entries, and every offset and
/// message length must fit in a u16.
pub fn encode_ed25519_instruction_data(entries: &[(Pubkey, [u8; 64], Vec<u8>)]) -> Result<Vec<u8>> {
    let count = u8::try_from(entries.len()).map_err(|_| error!(BridgeError::InvalidEd25519Instruction))?;
    let header_len = PREAMBLE_LEN + entries.len() * OFFSETS_LEN;
    let mut header = Vec::with_capacity(header_len);
    let mut body = Vec::new();

    header.push(count);
    header.push(0);

    for (pubkey, signature, message) in entries {
        let signature_offset = to_u16(header_len + body.len())?;
        body.extend_from_slice(signature);
        let pubkey_offset = to_u16(header_len + body.len())?;
        body.extend_from_slice(pubkey.as_ref());
        let message_offset = to_u16(header_len + body.len())?;
        body.extend_from_slice(message);
        let message_size = to_u16(message.len())?;
        // The last byte of the message must stay addressable
        to_u16(header_len + body.len() - 1)?;

        for value in [
            signature_offset,
            CURRENT_INSTRUCTION,
            pubkey_offset,
            CURRENT_INSTRUCTION,
            message_offset,
            message_size,
            CURRENT_INSTRUCTION,
        ] {
            header.extend_from_slice(&value.to_le_bytes());
        }
    }

    header.extend_from_slice(&body);
    Ok(header)
}

fn to_u16(value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| error!(BridgeError::InvalidEd25519Instruction))
}
