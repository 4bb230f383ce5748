//! # Environment Strategy
//!
//! Each account source resolves connections and identities its own way;
//! the resolver picks the strategy from the profile, never from the
//! environment's name.

use async_trait::async_trait;
use vs_01_ledger_client::{Identity, LedgerConnection};

use crate::errors::{ConfigurationError, ResolveError};
use crate::ports::outbound::{Connector, SecretSource};

/// Primary (owner candidate) and secondary (non-owner) identities.
#[derive(Debug, Clone)]
pub struct IdentityPair {
    pub primary: Identity,
    pub secondary: Identity,
}

/// How one kind of environment is resolved.
#[async_trait]
pub trait EnvironmentStrategy: Send + Sync {
    /// Strategy name for logs.
    fn kind(&self) -> &'static str;

    /// Validates every credential the strategy will need. Performs no I/O
    /// and runs before any connection is constructed.
    fn preflight(&self, secrets: &dyn SecretSource) -> Result<(), ConfigurationError>;

    /// Opens the environment's connection.
    async fn resolve_connection(
        &self,
        secrets: &dyn SecretSource,
        connector: &dyn Connector,
    ) -> Result<Box<dyn LedgerConnection>, ResolveError>;

    /// Produces the primary and secondary identities.
    async fn resolve_identities(
        &self,
        secrets: &dyn SecretSource,
        connection: &dyn LedgerConnection,
    ) -> Result<IdentityPair, ResolveError>;
}
