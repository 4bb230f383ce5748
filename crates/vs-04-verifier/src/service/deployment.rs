//! # Deployment Verifier
//!
//! Resolves an environment, deploys the store from the primary identity and
//! checks the balance effects of the deployment. The outcome is returned as
//! a [`VerificationContext`] that later steps borrow.

use shared_types::{Address, U256};
use tracing::{debug, info, instrument};
use vs_01_ledger_client::domain::compute_contract_address;
use vs_01_ledger_client::{ConfirmationPolicy, LedgerConnection};
use vs_02_value_store::{Deployment, ValueStoreContract, ValueStoreFactory};
use vs_03_environment::{EnvironmentResolver, ResolvedEnvironment};

use crate::domain::Step;
use crate::errors::VerificationError;

/// Everything a run knows after a verified deployment.
#[derive(Debug)]
pub struct VerificationContext {
    pub environment: ResolvedEnvironment,
    pub deployment: Deployment,
    /// Primary balance before and after the deployment.
    pub balance_before: U256,
    pub balance_after: U256,
    pub instance_balance: U256,
    /// Last name written by the owner, initially the constructor argument.
    pub last_authorized_name: String,
}

impl VerificationContext {
    #[must_use]
    pub fn connection(&self) -> &dyn LedgerConnection {
        self.environment.connection()
    }

    #[must_use]
    pub fn contract(&self) -> ValueStoreContract {
        self.deployment.contract
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.environment.primary.address()
    }
}

/// Deploys and verifies a fresh store.
pub struct DeploymentVerifier {
    resolver: EnvironmentResolver,
    factory: ValueStoreFactory,
    policy: ConfirmationPolicy,
}

impl DeploymentVerifier {
    #[must_use]
    pub fn new(
        resolver: EnvironmentResolver,
        factory: ValueStoreFactory,
        policy: ConfirmationPolicy,
    ) -> Self {
        Self {
            resolver,
            factory,
            policy,
        }
    }

    /// Resolves `environment`, deploys with `initial_name` and `funding` from
    /// the primary identity and checks the result.
    #[instrument(skip(self, funding), fields(funding = %funding))]
    pub async fn verify_deployment(
        &self,
        environment: &str,
        initial_name: &str,
        funding: U256,
    ) -> Result<VerificationContext, VerificationError> {
        let resolved = self.resolver.resolve(environment).await?;
        self.verify_resolved(resolved, initial_name, funding).await
    }

    /// As [`Self::verify_deployment`] on an already resolved environment.
    pub async fn verify_resolved(
        &self,
        environment: ResolvedEnvironment,
        initial_name: &str,
        funding: U256,
    ) -> Result<VerificationContext, VerificationError> {
        let connection = environment.connection();
        let primary = environment.primary.address();

        let balance_before = connection.get_balance(primary).await?;
        let nonce_before = connection.get_transaction_count(primary).await?;
        debug!(%primary, %balance_before, nonce_before, "primary state before deployment");

        let deployment = self
            .factory
            .deploy(connection, &environment.primary, initial_name, funding)
            .await?
            .confirm(connection, &self.policy)
            .await?;

        let balance_after = connection.get_balance(primary).await?;
        let instance_balance = deployment.contract.balance(connection).await?;

        let fail = |message: String| VerificationError::assertion(Step::Deployment, message);
        if deployment.receipt.from != primary {
            return Err(fail(format!(
                "receipt sender {} is not the primary identity {primary}",
                deployment.receipt.from
            )));
        }
        let expected = compute_contract_address(primary, nonce_before);
        if deployment.contract.address() != expected {
            return Err(fail(format!(
                "store deployed at {}, expected {expected} from nonce {nonce_before}",
                deployment.contract.address()
            )));
        }
        if instance_balance < funding {
            return Err(fail(format!(
                "instance balance {instance_balance} is below the funding {funding}"
            )));
        }
        if environment.profile.funding_constrained {
            if balance_after >= balance_before {
                return Err(fail(format!(
                    "primary balance did not decrease ({balance_before} -> {balance_after})"
                )));
            }
        } else {
            debug!("balance decrease check skipped for unconstrained environment");
        }

        info!(
            environment = environment.name(),
            store = %deployment.contract.address(),
            %instance_balance,
            "deployment verified"
        );

        Ok(VerificationContext {
            environment,
            last_authorized_name: deployment.initial_name.clone(),
            deployment,
            balance_before,
            balance_after,
            instance_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiring;
    use vs_01_ledger_client::InMemoryLedger;
    use vs_02_value_store::{ContractArtifact, NATIVE_INIT_CODE};
    use vs_03_environment::{AccountSource, EnvironmentProfile, ProfileTable};

    fn verifier(table: ProfileTable) -> DeploymentVerifier {
        let init_code = shared_types::Bytes::from(NATIVE_INIT_CODE);
        DeploymentVerifier::new(
            wiring::resolver(table, init_code.clone()),
            ValueStoreFactory::new(&ContractArtifact::from_bytecode(init_code)),
            ConfirmationPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_devnet_deployment() {
        let verifier = verifier(ProfileTable::builtin());
        let context = verifier
            .verify_deployment("devnet", "hossein", U256::from(5))
            .await
            .unwrap();

        assert_eq!(context.last_authorized_name, "hossein");
        assert!(context.instance_balance >= U256::from(5));
        assert_eq!(context.deployment.receipt.from, context.owner());
        assert_eq!(
            context.contract().address(),
            compute_contract_address(context.owner(), 0)
        );
        // The in-process ledger charges gas even though the check is skipped.
        assert!(context.balance_after < context.balance_before);
    }

    #[tokio::test]
    async fn test_funding_constrained_profile_is_checked() {
        let mut table = ProfileTable::builtin();
        table.insert(EnvironmentProfile {
            name: "devnet-strict".into(),
            endpoint: None,
            accounts: AccountSource::in_process(),
            funding_constrained: true,
        });
        let context = verifier(table)
            .verify_deployment("devnet-strict", "hossein", U256::zero())
            .await
            .unwrap();
        assert!(context.balance_after < context.balance_before);
    }

    #[tokio::test]
    async fn test_missing_program_fails_deployment() {
        // A plain ledger has no program behind the init code.
        let resolver = vs_03_environment::EnvironmentResolver::default()
            .with_ledger_factory(std::sync::Arc::new(InMemoryLedger::default));
        let verifier = DeploymentVerifier::new(
            resolver,
            ValueStoreFactory::new(&ContractArtifact::from_bytecode(
                shared_types::Bytes::from(NATIVE_INIT_CODE),
            )),
            ConfirmationPolicy::default(),
        );
        let err = verifier
            .verify_deployment("devnet", "hossein", U256::from(5))
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::Store(_)));
    }
}
