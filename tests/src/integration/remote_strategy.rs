//! # Secret-Wallet Environments
//!
//! The `sepolia` profile resolved with injected secrets and a connector that
//! points at an in-process ledger. Transactions are signed locally and sent
//! raw, exactly as against a hosted endpoint.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::U256;
    use vs_01_ledger_client::LedgerConnection;
    use vs_02_value_store::ValueStoreFactory;
    use vs_03_environment::ConfigurationError;
    use vs_04_verifier::{DeploymentVerifier, Step, StepOutcome, VerificationError};

    use crate::fixtures::{self, SharedLedgerConnector};

    #[tokio::test]
    async fn test_full_run_with_wallets() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let ledger = connector.ledger.clone();
        let secrets = fixtures::remote_secrets(&ledger);

        let report = fixtures::orchestrator(
            fixtures::resolver(connector.clone(), secrets),
            fixtures::fast_config(),
        )
        .run("sepolia")
        .await;

        assert!(report.passed(), "{report}");
        assert_eq!(
            connector.endpoints(),
            vec!["https://sepolia.infura.io/v3/test-project"]
        );

        let [owner, intruder] = [ledger.dev_accounts()[0], ledger.dev_accounts()[1]];
        // Deployment and rename were signed by the owner; the refused rename
        // never left the client.
        assert_eq!(ledger.get_transaction_count(owner).await.unwrap(), 2);
        assert_eq!(ledger.get_transaction_count(intruder).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wallet_deployment_spends_funds() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let secrets = fixtures::remote_secrets(&connector.ledger);
        let verifier = DeploymentVerifier::new(
            fixtures::resolver(connector.clone(), secrets),
            ValueStoreFactory::new(&fixtures::native_artifact()),
            fixtures::fast_policy(),
        );

        let funding = U256::from(1_000_000u64);
        let context = verifier
            .verify_deployment("sepolia", "hossein", funding)
            .await
            .unwrap();

        assert!(context.environment.profile.funding_constrained);
        assert!(context.environment.primary.has_secret());
        assert!(context.balance_before - context.balance_after > funding);
        assert_eq!(context.instance_balance, funding);
    }

    #[tokio::test]
    async fn test_malformed_key_fails_before_connection() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let secrets = fixtures::remote_secrets(&connector.ledger).with("PRIVATE_KEY2", "0xnot-hex");
        let verifier = DeploymentVerifier::new(
            fixtures::resolver(connector.clone(), secrets),
            ValueStoreFactory::new(&fixtures::native_artifact()),
            fixtures::fast_policy(),
        );

        let err = verifier
            .verify_deployment("sepolia", "hossein", U256::from(5))
            .await
            .unwrap_err();
        match err {
            VerificationError::Resolve(e) => {
                assert!(e.is_configuration());
                assert!(!e.to_string().contains("not-hex"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(connector.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_missing_project_id_is_a_configuration_error() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let secrets = vs_03_environment::StaticSecrets::default()
            .with("PRIVATE_KEY", connector.ledger.dev_secret(0).unwrap())
            .with("PRIVATE_KEY2", connector.ledger.dev_secret(1).unwrap());
        let verifier = DeploymentVerifier::new(
            fixtures::resolver(connector.clone(), secrets),
            ValueStoreFactory::new(&fixtures::native_artifact()),
            fixtures::fast_policy(),
        );

        let err = verifier
            .verify_deployment("sepolia", "hossein", U256::from(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VerificationError::Resolve(vs_03_environment::ResolveError::Configuration {
                source: ConfigurationError::MissingSecret(ref name),
                ..
            }) if name == "INFURA_PROJECT_ID"
        ));
        assert!(connector.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_same_key_twice_fails_unauthorized_step() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let key = connector.ledger.dev_secret(0).unwrap();
        let secrets = fixtures::remote_secrets(&connector.ledger).with("PRIVATE_KEY2", key);

        let report = fixtures::orchestrator(
            fixtures::resolver(connector, secrets),
            fixtures::fast_config(),
        )
        .run("sepolia")
        .await;

        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.failed_step().map(|r| r.step),
            Some(Step::UnauthorizedMutation)
        );
        assert!(matches!(
            report.outcome(Step::AuthorizedMutation),
            Some(StepOutcome::Passed { .. })
        ));
    }
}
