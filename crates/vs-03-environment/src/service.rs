//! # Environment Resolver
//!
//! ```text
//! resolve(name)
//!   │
//!   ├─ profile lookup ───────────── unknown ──► UnsupportedEnvironment
//!   ├─ strategy_for(profile)
//!   ├─ preflight (no I/O) ───────── missing ──► Configuration
//!   ├─ resolve_connection
//!   ├─ eth_chainId
//!   └─ resolve_identities ──► ResolvedEnvironment
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument};
use vs_01_ledger_client::{Identity, InMemoryLedger, LedgerConnection};

use crate::adapters::connector::HttpConnector;
use crate::adapters::secrets::ProcessEnv;
use crate::adapters::strategies::{
    InProcessStrategy, LedgerFactory, NodeAccountsStrategy, SecretWalletStrategy,
};
use crate::domain::profile::{AccountSource, EnvironmentProfile, ProfileTable};
use crate::errors::{ProfileError, ResolveError};
use crate::ports::outbound::{Connector, SecretSource};
use crate::ports::strategy::EnvironmentStrategy;

/// A connection and identities bound to one environment.
pub struct ResolvedEnvironment {
    pub profile: EnvironmentProfile,
    pub chain_id: u64,
    pub connection: Box<dyn LedgerConnection>,
    /// Owner candidate.
    pub primary: Identity,
    /// Non-owner candidate.
    pub secondary: Identity,
}

impl ResolvedEnvironment {
    #[must_use]
    pub fn connection(&self) -> &dyn LedgerConnection {
        self.connection.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }
}

impl fmt::Debug for ResolvedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedEnvironment")
            .field("profile", &self.profile.name)
            .field("chain_id", &self.chain_id)
            .field("endpoint", &self.connection.endpoint())
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .finish()
    }
}

/// Resolves environment names to connections and identities.
pub struct EnvironmentResolver {
    profiles: ProfileTable,
    secrets: Arc<dyn SecretSource>,
    connector: Arc<dyn Connector>,
    ledger_factory: LedgerFactory,
}

impl Default for EnvironmentResolver {
    fn default() -> Self {
        Self::new(ProfileTable::builtin())
    }
}

impl EnvironmentResolver {
    /// Resolver over `profiles`, reading secrets from the process
    /// environment and connecting over JSON-RPC.
    #[must_use]
    pub fn new(profiles: ProfileTable) -> Self {
        Self {
            profiles,
            secrets: Arc::new(ProcessEnv),
            connector: Arc::new(HttpConnector::default()),
            ledger_factory: Arc::new(InMemoryLedger::default),
        }
    }

    /// Resolver over a TOML profile file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ProfileError> {
        Ok(Self::new(ProfileTable::load(path)?))
    }

    #[must_use]
    pub fn with_secrets(mut self, secrets: Arc<dyn SecretSource>) -> Self {
        self.secrets = secrets;
        self
    }

    #[must_use]
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Factory for the ledgers of `in-process` environments.
    #[must_use]
    pub fn with_ledger_factory(mut self, factory: LedgerFactory) -> Self {
        self.ledger_factory = factory;
        self
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    fn strategy_for(&self, profile: &EnvironmentProfile) -> Box<dyn EnvironmentStrategy> {
        let environment = profile.name.clone();
        let endpoint = profile.endpoint.clone().unwrap_or_default();
        match &profile.accounts {
            AccountSource::Node {
                primary_index,
                secondary_index,
            } => Box::new(NodeAccountsStrategy {
                environment,
                endpoint,
                primary_index: *primary_index,
                secondary_index: *secondary_index,
            }),
            AccountSource::Secrets { primary, secondary } => Box::new(SecretWalletStrategy {
                environment,
                endpoint,
                primary_secret: primary.clone(),
                secondary_secret: secondary.clone(),
            }),
            AccountSource::InProcess {
                primary_index,
                secondary_index,
            } => Box::new(InProcessStrategy {
                environment,
                factory: Arc::clone(&self.ledger_factory),
                primary_index: *primary_index,
                secondary_index: *secondary_index,
            }),
        }
    }

    /// Resolves `environment` to a connection and two identities.
    ///
    /// Credentials are validated before any connection is constructed.
    #[instrument(skip(self))]
    pub async fn resolve(&self, environment: &str) -> Result<ResolvedEnvironment, ResolveError> {
        let profile = self.profiles.get(environment).cloned().ok_or_else(|| {
            ResolveError::UnsupportedEnvironment {
                name: environment.to_string(),
                known: self.profiles.names(),
            }
        })?;

        let strategy = self.strategy_for(&profile);
        strategy
            .preflight(self.secrets.as_ref())
            .map_err(|e| ResolveError::configuration(environment, e))?;

        let connection = strategy
            .resolve_connection(self.secrets.as_ref(), self.connector.as_ref())
            .await?;
        let chain_id = connection.chain_id().await?;
        let identities = strategy
            .resolve_identities(self.secrets.as_ref(), connection.as_ref())
            .await?;

        info!(
            environment,
            strategy = strategy.kind(),
            endpoint = %connection.endpoint(),
            chain_id,
            primary = %identities.primary,
            secondary = %identities.secondary,
            "environment resolved"
        );

        Ok(ResolvedEnvironment {
            profile,
            chain_id,
            connection,
            primary: identities.primary,
            secondary: identities.secondary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secrets::StaticSecrets;
    use crate::errors::ConfigurationError;
    use parking_lot::Mutex;
    use vs_01_ledger_client::ConnectionError;

    /// Records endpoints and hands out clones of one in-process ledger.
    #[derive(Default)]
    struct RecordingConnector {
        ledger: InMemoryLedger,
        endpoints: Mutex<Vec<String>>,
    }

    impl Connector for RecordingConnector {
        fn connect(&self, endpoint: &str) -> Result<Box<dyn LedgerConnection>, ConnectionError> {
            self.endpoints.lock().push(endpoint.to_string());
            Ok(Box::new(self.ledger.clone()))
        }
    }

    #[tokio::test]
    async fn test_unknown_environment() {
        let resolver = EnvironmentResolver::default();
        let err = resolver.resolve("mainnet").await.unwrap_err();
        match err {
            ResolveError::UnsupportedEnvironment { name, known } => {
                assert_eq!(name, "mainnet");
                assert_eq!(known, vec!["devnet", "localhost", "sepolia"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_secret_fails_before_connecting() {
        let connector = Arc::new(RecordingConnector::default());
        let resolver = EnvironmentResolver::default()
            .with_secrets(Arc::new(
                StaticSecrets::default().with("INFURA_PROJECT_ID", "project"),
            ))
            .with_connector(connector.clone());

        let err = resolver.resolve("sepolia").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Configuration {
                source: ConfigurationError::MissingSecret(ref name),
                ..
            } if name == "PRIVATE_KEY"
        ));
        assert!(connector.endpoints.lock().is_empty());
    }

    #[tokio::test]
    async fn test_node_profile_uses_loopback_and_pool() {
        let connector = Arc::new(RecordingConnector::default());
        let accounts = connector.ledger.dev_accounts().to_vec();
        let resolver = EnvironmentResolver::default()
            .with_secrets(Arc::new(StaticSecrets::default()))
            .with_connector(connector.clone());

        let env = resolver.resolve("localhost").await.unwrap();
        assert_eq!(*connector.endpoints.lock(), vec!["http://localhost:8545"]);
        assert_eq!(env.primary.address(), accounts[0]);
        assert_eq!(env.secondary.address(), accounts[1]);
        assert!(!env.profile.funding_constrained);
    }

    #[tokio::test]
    async fn test_secret_profile_builds_wallets() {
        let connector = Arc::new(RecordingConnector::default());
        let ledger = connector.ledger.clone();
        let secrets = StaticSecrets::default()
            .with("INFURA_PROJECT_ID", "project")
            .with("PRIVATE_KEY", ledger.dev_secret(0).unwrap())
            .with("PRIVATE_KEY2", ledger.dev_secret(1).unwrap());
        let resolver = EnvironmentResolver::default()
            .with_secrets(Arc::new(secrets))
            .with_connector(connector.clone());

        let env = resolver.resolve("sepolia").await.unwrap();
        assert_eq!(
            *connector.endpoints.lock(),
            vec!["https://sepolia.infura.io/v3/project"]
        );
        assert!(env.primary.has_secret());
        assert_eq!(env.primary.address(), ledger.dev_accounts()[0]);
        assert_eq!(env.secondary.address(), ledger.dev_accounts()[1]);
        assert!(env.profile.funding_constrained);
    }

    #[tokio::test]
    async fn test_in_process_profile_uses_factory() {
        let ledger = InMemoryLedger::default();
        let shared = ledger.clone();
        let resolver = EnvironmentResolver::default()
            .with_ledger_factory(Arc::new(move || shared.clone()));

        let env = resolver.resolve("devnet").await.unwrap();
        assert_eq!(env.chain_id, 31_337);
        assert_eq!(env.primary.address(), ledger.dev_accounts()[0]);
        assert_eq!(env.connection().endpoint(), "in-process");
    }
}
