//! # Error Types
//!
//! All error types for ledger connections and wallets.

use shared_types::{Address, Bytes, Hash, U256};
use thiserror::Error;

// =============================================================================
// CONNECTION ERRORS
// =============================================================================

/// Errors raised by a [`LedgerConnection`](crate::ports::outbound::LedgerConnection).
#[derive(Debug, Error, Clone)]
pub enum ConnectionError {
    /// The endpoint could not be reached or the HTTP exchange failed.
    #[error("transport error talking to {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The node answered with a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Execution reverted; `data` carries the revert payload when the node
    /// returned one.
    #[error("execution reverted: {message}")]
    Execution { message: String, data: Option<Bytes> },

    /// A response could not be decoded.
    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    /// The node does not manage the requested sender account.
    #[error("unknown signer: {0}")]
    UnknownSigner(Address),

    /// Sender cannot cover value plus gas.
    #[error("insufficient funds for {address}: required {required}, available {available}")]
    InsufficientFunds {
        address: Address,
        required: U256,
        available: U256,
    },

    /// A raw transaction was malformed or failed validation.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The transaction did not reach the requested depth in time.
    #[error(
        "transaction {tx_hash} not confirmed to depth {confirmations} within {waited_ms}ms"
    )]
    ConfirmationTimeout {
        tx_hash: Hash,
        confirmations: u64,
        waited_ms: u64,
    },

    /// Local signing failed.
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),
}

impl ConnectionError {
    /// Revert payload, if this is an execution error that carried one.
    #[must_use]
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            Self::Execution { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// Returns true if the ledger rejected the call by reverting.
    #[must_use]
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}

// =============================================================================
// WALLET ERRORS
// =============================================================================

/// Errors from wallet construction and signing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Secret material is not a valid 32-byte secp256k1 scalar.
    #[error("invalid secret key: {0}")]
    InvalidSecret(String),

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Signature could not be recovered to a public key.
    #[error("signature recovery failed")]
    Recovery,
}
