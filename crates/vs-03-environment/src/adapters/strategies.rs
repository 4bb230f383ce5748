//! # Environment Strategies
//!
//! | Account source | Connection | Identities |
//! |----------------|------------|------------|
//! | `node` | endpoint via `Connector` | `eth_accounts[i]`, node-managed |
//! | `secrets` | interpolated endpoint via `Connector` | wallets from two secrets |
//! | `in-process` | ledger from the registered factory | dev accounts, node-managed |

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use vs_01_ledger_client::{Identity, InMemoryLedger, LedgerConnection, Wallet};

use crate::domain::template;
use crate::errors::{ConfigurationError, ResolveError};
use crate::ports::outbound::{Connector, SecretSource};
use crate::ports::strategy::{EnvironmentStrategy, IdentityPair};

/// Builds the ledger of an `in-process` environment.
pub type LedgerFactory = Arc<dyn Fn() -> InMemoryLedger + Send + Sync>;

async fn pool_identities(
    environment: &str,
    connection: &dyn LedgerConnection,
    primary_index: usize,
    secondary_index: usize,
) -> Result<IdentityPair, ResolveError> {
    let accounts = connection.accounts().await?;
    let required = primary_index.max(secondary_index);
    if accounts.len() <= required {
        return Err(ResolveError::configuration(
            environment,
            ConfigurationError::InsufficientAccounts {
                required,
                available: accounts.len(),
            },
        ));
    }
    Ok(IdentityPair {
        primary: Identity::node_managed(accounts[primary_index]),
        secondary: Identity::node_managed(accounts[secondary_index]),
    })
}

// =============================================================================
// NODE ACCOUNTS
// =============================================================================

/// Local development node: accounts managed by the node itself.
#[derive(Debug, Clone)]
pub struct NodeAccountsStrategy {
    pub environment: String,
    pub endpoint: String,
    pub primary_index: usize,
    pub secondary_index: usize,
}

#[async_trait]
impl EnvironmentStrategy for NodeAccountsStrategy {
    fn kind(&self) -> &'static str {
        "node"
    }

    fn preflight(&self, secrets: &dyn SecretSource) -> Result<(), ConfigurationError> {
        template::interpolate(&self.endpoint, secrets).map(|_| ())
    }

    async fn resolve_connection(
        &self,
        secrets: &dyn SecretSource,
        connector: &dyn Connector,
    ) -> Result<Box<dyn LedgerConnection>, ResolveError> {
        let endpoint = template::interpolate(&self.endpoint, secrets)
            .map_err(|e| ResolveError::configuration(&self.environment, e))?;
        Ok(connector.connect(&endpoint)?)
    }

    async fn resolve_identities(
        &self,
        _secrets: &dyn SecretSource,
        connection: &dyn LedgerConnection,
    ) -> Result<IdentityPair, ResolveError> {
        pool_identities(
            &self.environment,
            connection,
            self.primary_index,
            self.secondary_index,
        )
        .await
    }
}

// =============================================================================
// SECRET WALLETS
// =============================================================================

/// Remote ledger: wallets built from two named secrets.
#[derive(Debug, Clone)]
pub struct SecretWalletStrategy {
    pub environment: String,
    pub endpoint: String,
    pub primary_secret: String,
    pub secondary_secret: String,
}

impl SecretWalletStrategy {
    fn wallet(secrets: &dyn SecretSource, name: &str) -> Result<Wallet, ConfigurationError> {
        let secret = secrets
            .non_empty(name)
            .ok_or_else(|| ConfigurationError::MissingSecret(name.to_string()))?;
        // The parser's message may quote characters of the secret.
        Wallet::from_secret_hex(&secret).map_err(|_| ConfigurationError::MalformedSecret {
            name: name.to_string(),
            reason: "expected a 32-byte hex secp256k1 secret key".to_string(),
        })
    }
}

#[async_trait]
impl EnvironmentStrategy for SecretWalletStrategy {
    fn kind(&self) -> &'static str {
        "secrets"
    }

    fn preflight(&self, secrets: &dyn SecretSource) -> Result<(), ConfigurationError> {
        template::interpolate(&self.endpoint, secrets)?;
        Self::wallet(secrets, &self.primary_secret)?;
        Self::wallet(secrets, &self.secondary_secret)?;
        Ok(())
    }

    async fn resolve_connection(
        &self,
        secrets: &dyn SecretSource,
        connector: &dyn Connector,
    ) -> Result<Box<dyn LedgerConnection>, ResolveError> {
        let endpoint = template::interpolate(&self.endpoint, secrets)
            .map_err(|e| ResolveError::configuration(&self.environment, e))?;
        Ok(connector.connect(&endpoint)?)
    }

    async fn resolve_identities(
        &self,
        secrets: &dyn SecretSource,
        _connection: &dyn LedgerConnection,
    ) -> Result<IdentityPair, ResolveError> {
        let wallet = |name: &str| {
            Self::wallet(secrets, name).map_err(|e| ResolveError::configuration(&self.environment, e))
        };
        Ok(IdentityPair {
            primary: Identity::from_wallet(wallet(&self.primary_secret)?),
            secondary: Identity::from_wallet(wallet(&self.secondary_secret)?),
        })
    }
}

// =============================================================================
// IN-PROCESS
// =============================================================================

/// In-process development ledger.
#[derive(Clone)]
pub struct InProcessStrategy {
    pub environment: String,
    pub factory: LedgerFactory,
    pub primary_index: usize,
    pub secondary_index: usize,
}

impl fmt::Debug for InProcessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessStrategy")
            .field("environment", &self.environment)
            .field("primary_index", &self.primary_index)
            .field("secondary_index", &self.secondary_index)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EnvironmentStrategy for InProcessStrategy {
    fn kind(&self) -> &'static str {
        "in-process"
    }

    fn preflight(&self, _secrets: &dyn SecretSource) -> Result<(), ConfigurationError> {
        Ok(())
    }

    async fn resolve_connection(
        &self,
        _secrets: &dyn SecretSource,
        _connector: &dyn Connector,
    ) -> Result<Box<dyn LedgerConnection>, ResolveError> {
        let ledger = (self.factory)();
        debug!(environment = %self.environment, "in-process ledger created");
        Ok(Box::new(ledger))
    }

    async fn resolve_identities(
        &self,
        _secrets: &dyn SecretSource,
        connection: &dyn LedgerConnection,
    ) -> Result<IdentityPair, ResolveError> {
        pool_identities(
            &self.environment,
            connection,
            self.primary_index,
            self.secondary_index,
        )
        .await
    }
}
