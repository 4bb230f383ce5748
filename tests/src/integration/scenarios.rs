//! # End-to-End Scenarios
//!
//! | Scenario | Flow |
//! |----------|------|
//! | A | deploy("hossein", 5) on a local ledger, read back name and balance |
//! | B | owner renames to "ali", one `NameSet("ali")`, read reflects it |
//! | C | non-owner renames, refused with `NotOwner`, name unchanged |
//! | D | remote environment without a secret fails before any connection |

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use shared_types::U256;
    use vs_01_ledger_client::domain::compute_contract_address;
    use vs_01_ledger_client::{
        ConfirmationPolicy, ConnectionError, Identity, InMemoryLedgerConfig, LedgerConnection,
    };
    use vs_02_value_store::{StoreError, ValueStoreFactory};
    use vs_03_environment::{ConfigurationError, ResolveError, StaticSecrets};
    use vs_04_verifier::{DeploymentVerifier, Step, StepOutcome, VerificationError};

    use crate::fixtures::{self, SharedLedgerConnector};

    fn verifier(connector: Arc<SharedLedgerConnector>, secrets: StaticSecrets) -> DeploymentVerifier {
        DeploymentVerifier::new(
            fixtures::resolver(connector, secrets),
            ValueStoreFactory::new(&fixtures::native_artifact()),
            fixtures::fast_policy(),
        )
    }

    // =========================================================================
    // SCENARIO A: DEPLOY AND READ
    // =========================================================================

    #[tokio::test]
    async fn test_scenario_a_deploy_on_local_node() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let context = verifier(connector.clone(), StaticSecrets::default())
            .verify_deployment("localhost", "hossein", U256::from(5))
            .await
            .unwrap();

        assert_eq!(connector.endpoints(), vec!["http://localhost:8545"]);
        let contract = context.contract();
        assert_eq!(contract.get_name(context.connection()).await.unwrap(), "hossein");
        assert!(contract.balance(context.connection()).await.unwrap() >= U256::from(5));
        assert_eq!(
            contract.owner(context.connection()).await.unwrap(),
            connector.ledger.dev_accounts()[0]
        );
    }

    // =========================================================================
    // SCENARIO B: OWNER RENAMES
    // =========================================================================

    #[tokio::test]
    async fn test_scenario_b_owner_renames() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let context = verifier(connector, StaticSecrets::default())
            .verify_deployment("localhost", "hossein", U256::from(5))
            .await
            .unwrap();

        let event = context
            .contract()
            .change_name(context.connection(), &context.environment.primary, "ali")
            .await
            .unwrap();
        assert_eq!(event.new_name, "ali");
        assert_eq!(
            context.contract().get_name(context.connection()).await.unwrap(),
            "ali"
        );
    }

    // =========================================================================
    // SCENARIO C: NON-OWNER IS REFUSED
    // =========================================================================

    #[tokio::test]
    async fn test_scenario_c_non_owner_is_refused() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let context = verifier(connector, StaticSecrets::default())
            .verify_deployment("localhost", "hossein", U256::from(5))
            .await
            .unwrap();
        let head = context.connection().block_number().await.unwrap();

        let err = context
            .contract()
            .change_name(context.connection(), &context.environment.secondary, "ali")
            .await
            .unwrap_err();
        assert!(err.is_not_owner());
        assert_eq!(err.reason(), Some("NotOwner"));
        assert_eq!(
            context.contract().get_name(context.connection()).await.unwrap(),
            "hossein"
        );
        // Nothing was broadcast, so no block and no event.
        assert_eq!(context.connection().block_number().await.unwrap(), head);
    }

    // =========================================================================
    // SCENARIO D: MISSING SECRET
    // =========================================================================

    #[tokio::test]
    async fn test_scenario_d_missing_secret_before_connection() {
        let connector = Arc::new(SharedLedgerConnector::default());
        let secrets = StaticSecrets::default()
            .with("INFURA_PROJECT_ID", "test-project")
            .with("PRIVATE_KEY", connector.ledger.dev_secret(0).unwrap());

        let err = verifier(connector.clone(), secrets)
            .verify_deployment("sepolia", "hossein", U256::from(5))
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(matches!(
            err,
            VerificationError::Resolve(ResolveError::Configuration {
                source: ConfigurationError::MissingSecret(ref name),
                ..
            }) if name == "PRIVATE_KEY2"
        ));
        assert!(connector.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_d_whitespace_secret_counts_as_missing() {
        let connector = Arc::new(SharedLedgerConnector::default());
        let secrets = fixtures::remote_secrets(&connector.ledger).with("PRIVATE_KEY", "   ");

        let report = fixtures::orchestrator(
            fixtures::resolver(connector.clone(), secrets),
            fixtures::fast_config(),
        )
        .run("sepolia")
        .await;

        assert_eq!(report.exit_code(), 1);
        match report.outcome(Step::Deployment) {
            Some(StepOutcome::Failed { error }) => assert!(error.contains("PRIVATE_KEY")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(connector.endpoints().is_empty());
    }

    // =========================================================================
    // FULL RUNS
    // =========================================================================

    #[tokio::test]
    async fn test_full_run_on_local_node() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let report = fixtures::orchestrator(
            fixtures::resolver(connector, StaticSecrets::default()),
            fixtures::fast_config(),
        )
        .run("localhost")
        .await;

        assert!(report.passed(), "{report}");
        assert_eq!(report.exit_code(), 0);
        let names: Vec<_> = report.steps.iter().map(|r| r.step.name()).collect();
        assert_eq!(
            names,
            vec![
                "deployment",
                "read-after-deploy",
                "owner",
                "authorized-mutation",
                "unauthorized-mutation"
            ]
        );
    }

    #[tokio::test]
    async fn test_full_run_on_devnet() {
        let report = fixtures::orchestrator(
            fixtures::resolver(Arc::default(), StaticSecrets::default()),
            fixtures::fast_config(),
        )
        .run("devnet")
        .await;
        assert!(report.passed(), "{report}");
    }

    #[tokio::test]
    async fn test_unknown_environment_is_reported() {
        let report = fixtures::orchestrator(
            fixtures::resolver(Arc::default(), StaticSecrets::default()),
            fixtures::fast_config(),
        )
        .run("goerli")
        .await;
        assert_eq!(report.exit_code(), 1);
        match report.outcome(Step::Deployment) {
            Some(StepOutcome::Failed { error }) => {
                assert!(error.contains("unsupported environment `goerli`"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    // =========================================================================
    // CONFIRMATION
    // =========================================================================

    #[tokio::test]
    async fn test_unmined_deployment_times_out() {
        let ledger = fixtures::devnet_with(InMemoryLedgerConfig {
            automine: false,
            ..InMemoryLedgerConfig::default()
        });
        let connector = Arc::new(SharedLedgerConnector::new(ledger));
        let verifier = DeploymentVerifier::new(
            fixtures::resolver(connector, StaticSecrets::default()),
            ValueStoreFactory::new(&fixtures::native_artifact()),
            ConfirmationPolicy {
                confirmations: 1,
                timeout: Duration::from_millis(200),
                poll_interval: Duration::from_millis(20),
            },
        );

        let err = verifier
            .verify_deployment("localhost", "hossein", U256::from(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VerificationError::Store(StoreError::Connection(
                ConnectionError::ConfirmationTimeout { confirmations: 1, .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_deeper_confirmation_waits_for_blocks() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let ledger = connector.ledger.clone();
        let verifier = DeploymentVerifier::new(
            fixtures::resolver(connector, StaticSecrets::default()),
            ValueStoreFactory::new(&fixtures::native_artifact()),
            ConfirmationPolicy {
                confirmations: 3,
                ..fixtures::fast_policy()
            },
        );

        let miner = tokio::spawn(async move {
            for _ in 0..20 {
                tokio::time::sleep(Duration::from_millis(20)).await;
                ledger.mine(1);
            }
        });
        let context = verifier
            .verify_deployment("localhost", "hossein", U256::from(5))
            .await
            .unwrap();
        let head = context.connection().block_number().await.unwrap();
        assert!(context.deployment.receipt.confirmations(head) >= 3);
        miner.abort();
    }

    #[tokio::test]
    async fn test_repeat_deployment_lands_at_next_nonce_address() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let verifier = verifier(connector.clone(), StaticSecrets::default());
        let owner = connector.ledger.dev_accounts()[0];

        let first = verifier
            .verify_deployment("localhost", "hossein", U256::from(5))
            .await
            .unwrap();
        let second = verifier
            .verify_deployment("localhost", "ali", U256::from(5))
            .await
            .unwrap();

        assert_eq!(first.contract().address(), compute_contract_address(owner, 0));
        assert_eq!(second.contract().address(), compute_contract_address(owner, 1));
        assert_eq!(
            second.contract().get_name(second.connection()).await.unwrap(),
            "ali"
        );
    }

    #[tokio::test]
    async fn test_primary_is_node_managed_on_local_profiles() {
        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let context = verifier(connector.clone(), StaticSecrets::default())
            .verify_deployment("localhost", "hossein", U256::zero())
            .await
            .unwrap();
        assert_eq!(
            context.environment.primary,
            Identity::node_managed(connector.ledger.dev_accounts()[0])
        );
        assert!(!context.environment.primary.has_secret());
    }
}
