//! # Error Types
//!
//! Errors raised while parsing shared primitives.

use thiserror::Error;

/// Errors from hex parsing of addresses, hashes and byte strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    /// Input is not valid hex.
    #[error("invalid hex: {0}")]
    Invalid(String),

    /// Input decoded to the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    /// Quantity is not a valid `0x`-prefixed hex number.
    #[error("invalid quantity: {0}")]
    Quantity(String),
}

/// Errors from ABI decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Data ended before the value did.
    #[error("ABI data out of bounds: need {needed} bytes, have {available}")]
    OutOfBounds { needed: usize, available: usize },

    /// An offset or length word does not fit the data.
    #[error("invalid ABI offset at byte {0}")]
    InvalidOffset(usize),

    /// A `string` value is not UTF-8.
    #[error("ABI string is not valid UTF-8")]
    InvalidUtf8,

    /// An `address` word has non-zero high bytes.
    #[error("invalid ABI address word")]
    InvalidAddress,
}
