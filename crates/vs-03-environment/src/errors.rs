//! # Error Types
//!
//! All error types for profile loading and environment resolution.

use thiserror::Error;
use vs_01_ledger_client::ConnectionError;

// =============================================================================
// PROFILE ERRORS
// =============================================================================

/// Errors loading a profile table.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The file could not be read.
    #[error("cannot read profile table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid profile table.
    #[error("invalid profile table: {0}")]
    Parse(#[from] toml::de::Error),

    /// A profile without an endpoint needs one for its account source.
    #[error("profile `{0}` needs an endpoint")]
    MissingEndpoint(String),

    /// Both identities would be the same account.
    #[error("profile `{0}` uses the same account for primary and secondary identity")]
    SameIdentity(String),
}

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

/// Missing or invalid credentials for an environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required secret or credential is absent or empty.
    #[error("required variable `{0}` is not set")]
    MissingSecret(String),

    /// A secret is present but unusable.
    #[error("variable `{name}` is malformed: {reason}")]
    MalformedSecret { name: String, reason: String },

    /// An endpoint template has an unterminated `${` placeholder.
    #[error("malformed endpoint template: {0}")]
    MalformedTemplate(String),

    /// The node exposes fewer accounts than the profile selects.
    #[error("environment exposes {available} accounts, index {required} required")]
    InsufficientAccounts { required: usize, available: usize },
}

// =============================================================================
// RESOLVE ERRORS
// =============================================================================

/// Errors from [`EnvironmentResolver::resolve`](crate::service::EnvironmentResolver::resolve).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Credentials for the environment are missing or invalid.
    #[error("configuration error for environment `{environment}`: {source}")]
    Configuration {
        environment: String,
        #[source]
        source: ConfigurationError,
    },

    /// No profile has this name.
    #[error("unsupported environment `{name}` (known: {})", .known.join(", "))]
    UnsupportedEnvironment { name: String, known: Vec<String> },

    /// The ledger could not be reached or answered with an error.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
}

impl ResolveError {
    pub(crate) fn configuration(environment: &str, source: ConfigurationError) -> Self {
        Self::Configuration {
            environment: environment.to_string(),
            source,
        }
    }

    /// Returns true for missing or invalid credentials.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
