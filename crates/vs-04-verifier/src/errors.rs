//! # Error Types

use thiserror::Error;
use vs_01_ledger_client::ConnectionError;
use vs_02_value_store::StoreError;
use vs_03_environment::ResolveError;

use crate::domain::Step;

/// Errors that fail a verification step.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The environment could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A value store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A direct ledger read failed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// An observed value differs from the expected one.
    #[error("{step}: {message}")]
    Assertion { step: Step, message: String },
}

impl VerificationError {
    pub(crate) fn assertion(step: Step, message: impl Into<String>) -> Self {
        Self::Assertion {
            step,
            message: message.into(),
        }
    }

    /// True for missing or malformed configuration.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Resolve(e) if e.is_configuration())
    }
}
