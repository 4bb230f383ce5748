//! # ABI Codec
//!
//! The subset of the Solidity contract ABI the workspace speaks: function
//! selectors, event topics, single `string` and `address` values, and the
//! `Error(string)` revert payload.

use crate::errors::AbiError;
use crate::hashing::keccak256;
use crate::value_objects::{Address, Bytes, Hash, U256};

/// ABI word size.
pub const WORD: usize = 32;

/// Selector of `Error(string)`, the payload of `require(cond, "reason")`.
pub const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// First four bytes of the Keccak-256 of a canonical function signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.0[..4]);
    out
}

/// Topic-0 of an event: Keccak-256 of its canonical signature.
#[must_use]
pub fn event_topic(signature: &str) -> Hash {
    keccak256(signature.as_bytes())
}

/// Calldata for `signature` with already-encoded `args`.
#[must_use]
pub fn encode_call(signature: &str, args: &[u8]) -> Bytes {
    let mut data = Vec::with_capacity(4 + args.len());
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(args);
    Bytes(data)
}

/// Encodes the one-element tuple `(string)`.
#[must_use]
pub fn encode_string(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let padded = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(2 * WORD + padded);
    out.extend_from_slice(&word_from_usize(WORD));
    out.extend_from_slice(&word_from_usize(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(2 * WORD + padded, 0);
    out
}

/// Decodes the one-element tuple `(string)`.
pub fn decode_string(data: &[u8]) -> Result<String, AbiError> {
    let offset = read_usize(data, 0)?;
    let length = read_usize(data, offset)?;
    let start = offset
        .checked_add(WORD)
        .ok_or(AbiError::InvalidOffset(offset))?;
    let end = start
        .checked_add(length)
        .ok_or(AbiError::InvalidOffset(offset))?;
    let raw = data.get(start..end).ok_or(AbiError::OutOfBounds {
        needed: end,
        available: data.len(),
    })?;
    String::from_utf8(raw.to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

/// Encodes the one-element tuple `(address)`.
#[must_use]
pub fn encode_address(address: Address) -> Vec<u8> {
    let mut word = vec![0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Decodes the one-element tuple `(address)`.
pub fn decode_address(data: &[u8]) -> Result<Address, AbiError> {
    let word = data.get(..WORD).ok_or(AbiError::OutOfBounds {
        needed: WORD,
        available: data.len(),
    })?;
    if word[..12].iter().any(|&b| b != 0) {
        return Err(AbiError::InvalidAddress);
    }
    Address::from_slice(&word[12..]).ok_or(AbiError::InvalidAddress)
}

/// Builds the `Error(string)` revert payload for `reason`.
#[must_use]
pub fn encode_revert_reason(reason: &str) -> Bytes {
    let mut data = ERROR_SELECTOR.to_vec();
    data.extend_from_slice(&encode_string(reason));
    Bytes(data)
}

/// Extracts the reason from an `Error(string)` revert payload.
///
/// Returns `None` for empty reverts, custom errors and malformed payloads.
#[must_use]
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let body = data.strip_prefix(&ERROR_SELECTOR[..])?;
    decode_string(body).ok()
}

fn word_from_usize(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    U256::from(value).to_big_endian(&mut word);
    word
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let end = at.checked_add(WORD).ok_or(AbiError::InvalidOffset(at))?;
    let word = data.get(at..end).ok_or(AbiError::OutOfBounds {
        needed: end,
        available: data.len(),
    })?;
    let value = U256::from_big_endian(word);
    if value > U256::from(u32::MAX) {
        return Err(AbiError::InvalidOffset(at));
    }
    Ok(value.as_usize())
}
