//! # Owner-Guard Properties
//!
//! Run on the in-process ledger through the contract binding:
//!
//! - any caller other than the owner leaves the name unchanged and produces
//!   no `NameSet` event
//! - the owner's rename is observed and carries exactly one event
//! - a fresh deployment reads back its constructor name, owner and funding

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use shared_types::{Address, U256};
    use vs_01_ledger_client::{Identity, InMemoryLedger, LedgerConnection};
    use vs_02_value_store::{Deployment, ValueStoreFactory};

    use crate::fixtures;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    async fn deploy(ledger: &InMemoryLedger, owner: &Identity, name: &str, funding: U256) -> Deployment {
        ValueStoreFactory::new(&fixtures::native_artifact())
            .deploy(ledger, owner, name, funding)
            .await
            .unwrap()
            .confirm(ledger, &fixtures::fast_policy())
            .await
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_non_owner_cannot_rename(caller in any::<[u8; 20]>(), name in "[a-zA-Z0-9 ]{0,48}") {
            let ledger = fixtures::devnet();
            let owner = Identity::node_managed(ledger.dev_accounts()[0]);
            let caller = Address::new(caller);
            prop_assume!(caller != owner.address());

            runtime().block_on(async {
                let deployment = deploy(&ledger, &owner, "hossein", U256::from(5)).await;
                let head = ledger.block_number().await.unwrap();

                let err = deployment
                    .contract
                    .change_name(&ledger, &Identity::node_managed(caller), &name)
                    .await
                    .unwrap_err();
                assert!(err.is_not_owner());
                assert_eq!(deployment.contract.get_name(&ledger).await.unwrap(), "hossein");
                assert_eq!(ledger.block_number().await.unwrap(), head);
            });
        }

        #[test]
        fn prop_owner_rename_is_observed(names in proptest::collection::vec("[a-zA-Z0-9 ]{0,48}", 1..4)) {
            let ledger = fixtures::devnet();
            let owner = Identity::node_managed(ledger.dev_accounts()[0]);

            runtime().block_on(async {
                let deployment = deploy(&ledger, &owner, "hossein", U256::zero()).await;
                for name in &names {
                    let event = deployment
                        .contract
                        .change_name(&ledger, &owner, name)
                        .await
                        .unwrap();
                    assert_eq!(&event.new_name, name);
                    assert_eq!(&deployment.contract.get_name(&ledger).await.unwrap(), name);
                }
                assert_eq!(deployment.contract.owner(&ledger).await.unwrap(), owner.address());
            });
        }

        #[test]
        fn prop_deployment_reads_back(
            name in "[a-zA-Z0-9 ]{0,64}",
            funding in 0u64..1_000_000_000_000_000_000,
            deployer in 0usize..10,
        ) {
            let ledger = fixtures::devnet();
            let owner = Identity::node_managed(ledger.dev_accounts()[deployer]);

            runtime().block_on(async {
                let deployment = deploy(&ledger, &owner, &name, U256::from(funding)).await;
                let snapshot = deployment.contract.snapshot(&ledger).await.unwrap();
                assert_eq!(snapshot.name, name);
                assert_eq!(snapshot.owner, owner.address());
                assert!(snapshot.balance >= U256::from(funding));
            });
        }
    }
}
