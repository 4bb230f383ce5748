//! # Test Fixtures
//!
//! In-process ledgers with the value store registered, a connector that
//! hands every endpoint the same ledger, and resolvers built from them.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::Bytes;
use vs_01_ledger_client::{
    ConfirmationPolicy, ConnectionError, InMemoryLedger, InMemoryLedgerConfig, LedgerConnection,
};
use vs_02_value_store::{ContractArtifact, ValueStoreProgram, NATIVE_INIT_CODE};
use vs_03_environment::{Connector, EnvironmentResolver, ProfileTable, StaticSecrets};
use vs_04_verifier::{wiring, Orchestrator, VerifierConfig};

/// Artifact whose bytecode is the native program's init code.
pub fn native_artifact() -> ContractArtifact {
    ContractArtifact::from_bytecode(Bytes::from(NATIVE_INIT_CODE))
}

/// Automining ledger running the value store.
pub fn devnet() -> InMemoryLedger {
    devnet_with(InMemoryLedgerConfig::default())
}

pub fn devnet_with(config: InMemoryLedgerConfig) -> InMemoryLedger {
    let ledger = InMemoryLedger::new(config);
    ValueStoreProgram::register(&ledger, Bytes::from(NATIVE_INIT_CODE));
    ledger
}

/// Short polling so failing waits finish quickly.
pub fn fast_policy() -> ConfirmationPolicy {
    ConfirmationPolicy {
        confirmations: 1,
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
    }
}

pub fn fast_config() -> VerifierConfig {
    VerifierConfig {
        confirmation: fast_policy(),
        ..VerifierConfig::default()
    }
}

/// Connects every endpoint to one shared ledger and records the endpoints.
#[derive(Default)]
pub struct SharedLedgerConnector {
    pub ledger: InMemoryLedger,
    endpoints: Mutex<Vec<String>>,
}

impl SharedLedgerConnector {
    pub fn new(ledger: InMemoryLedger) -> Self {
        Self {
            ledger,
            endpoints: Mutex::new(Vec::new()),
        }
    }

    /// Endpoints connected so far.
    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().clone()
    }
}

impl Connector for SharedLedgerConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn LedgerConnection>, ConnectionError> {
        self.endpoints.lock().push(endpoint.to_string());
        Ok(Box::new(self.ledger.clone()))
    }
}

/// Credentials of a remote environment whose wallets are the ledger's first
/// two dev accounts.
pub fn remote_secrets(ledger: &InMemoryLedger) -> StaticSecrets {
    StaticSecrets::default()
        .with("INFURA_PROJECT_ID", "test-project")
        .with("PRIVATE_KEY", ledger.dev_secret(0).expect("dev account 0"))
        .with("PRIVATE_KEY2", ledger.dev_secret(1).expect("dev account 1"))
}

/// Resolver over the built-in profiles with injected secrets and connector.
pub fn resolver(
    connector: Arc<SharedLedgerConnector>,
    secrets: StaticSecrets,
) -> EnvironmentResolver {
    wiring::resolver(ProfileTable::builtin(), Bytes::from(NATIVE_INIT_CODE))
        .with_secrets(Arc::new(secrets))
        .with_connector(connector)
}

pub fn orchestrator(resolver: EnvironmentResolver, config: VerifierConfig) -> Orchestrator {
    wiring::orchestrator(resolver, &native_artifact(), config)
}
