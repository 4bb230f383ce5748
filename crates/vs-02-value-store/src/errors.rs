//! # Error Types
//!
//! All error types for the value store and its artifacts.

use shared_types::{abi, AbiError, Address, Hash};
use thiserror::Error;
use vs_01_ledger_client::ConnectionError;

/// Revert reason of a mutation attempted by anyone but the owner.
pub const NOT_OWNER_REASON: &str = "NotOwner";

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors from value store operations.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Caller is not the owner. The on-ledger reason string is exactly
    /// [`NOT_OWNER_REASON`].
    #[error("caller {caller} is not the owner")]
    NotOwner { caller: Address },

    /// Execution reverted for any other reason.
    #[error("execution reverted{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted { reason: Option<String> },

    /// The transaction was mined but failed.
    #[error("transaction {0} failed on-ledger")]
    TransactionFailed(Hash),

    /// A creation receipt without a contract address.
    #[error("deployment {0} produced no contract address")]
    MissingContractAddress(Hash),

    /// A confirmed mutation did not carry exactly one change event.
    #[error("transaction {tx_hash} emitted {count} NameSet events, expected exactly one")]
    UnexpectedEvents { tx_hash: Hash, count: usize },

    /// Return data could not be decoded.
    #[error("ABI decoding failed: {0}")]
    Abi(#[from] AbiError),

    /// Ledger connection failure.
    #[error(transparent)]
    Connection(ConnectionError),
}

impl StoreError {
    /// Reason string as surfaced by the ledger, if the error is a revert.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::NotOwner { .. } => Some(NOT_OWNER_REASON),
            Self::Reverted { reason } => reason.as_deref(),
            _ => None,
        }
    }

    /// Returns true for the owner-guard rejection.
    #[must_use]
    pub fn is_not_owner(&self) -> bool {
        matches!(self, Self::NotOwner { .. })
    }

    /// Interprets a connection error raised while `caller` was acting.
    ///
    /// Reverts are decoded from their `Error(string)` payload, or from the
    /// `reverted with reason string '...'` message of nodes that omit it.
    #[must_use]
    pub fn from_connection(error: ConnectionError, caller: Address) -> Self {
        if !error.is_revert() {
            return Self::Connection(error);
        }
        let reason = error
            .revert_data()
            .and_then(|data| abi::decode_revert_reason(data.as_slice()))
            .or_else(|| reason_from_message(&error.to_string()));
        match reason {
            Some(r) if r == NOT_OWNER_REASON => Self::NotOwner { caller },
            reason => Self::Reverted { reason },
        }
    }
}

impl From<ConnectionError> for StoreError {
    fn from(error: ConnectionError) -> Self {
        Self::Connection(error)
    }
}

fn reason_from_message(message: &str) -> Option<String> {
    const MARKER: &str = "reverted with reason string '";
    let start = message.find(MARKER)? + MARKER.len();
    let rest = &message[start..];
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

// =============================================================================
// ARTIFACT ERRORS
// =============================================================================

/// Errors loading a compiled contract artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The file could not be read.
    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON artifact.
    #[error("invalid artifact JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The artifact has no deployable bytecode.
    #[error("artifact has no bytecode")]
    MissingBytecode,
}
