//! # Wiring
//!
//! Connects the value store program to in-process ledgers and builds the
//! resolver and orchestrator for a run.

use std::sync::Arc;

use shared_types::Bytes;
use vs_01_ledger_client::InMemoryLedger;
use vs_02_value_store::{ContractArtifact, ValueStoreFactory, ValueStoreProgram};
use vs_03_environment::{AccountSource, EnvironmentResolver, LedgerFactory, ProfileTable};

use crate::domain::VerifierConfig;
use crate::service::{DeploymentVerifier, Orchestrator};

/// Fresh in-process ledgers that run the store for `init_code`.
#[must_use]
pub fn devnet_factory(init_code: Bytes) -> LedgerFactory {
    Arc::new(move || {
        let ledger = InMemoryLedger::default();
        ValueStoreProgram::register(&ledger, init_code.clone());
        ledger
    })
}

/// Resolver over `profiles` whose in-process environments run the store.
#[must_use]
pub fn resolver(profiles: ProfileTable, init_code: Bytes) -> EnvironmentResolver {
    EnvironmentResolver::new(profiles).with_ledger_factory(devnet_factory(init_code))
}

/// True when `environment` is a known profile backed by a real ledger,
/// which needs compiled bytecode.
#[must_use]
pub fn requires_artifact(profiles: &ProfileTable, environment: &str) -> bool {
    profiles
        .get(environment)
        .is_some_and(|p| !matches!(p.accounts, AccountSource::InProcess { .. }))
}

/// Orchestrator deploying `artifact` with `config`.
#[must_use]
pub fn orchestrator(
    resolver: EnvironmentResolver,
    artifact: &ContractArtifact,
    config: VerifierConfig,
) -> Orchestrator {
    let verifier = DeploymentVerifier::new(
        resolver,
        ValueStoreFactory::new(artifact),
        config.confirmation,
    );
    Orchestrator::new(verifier, config)
}
