//! # Files on Disk
//!
//! Profile tables and contract artifacts loaded from files, then used for a
//! full run.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use shared_types::Bytes;
    use vs_02_value_store::{ContractArtifact, NATIVE_INIT_CODE};
    use vs_03_environment::{EnvironmentResolver, ProfileError, ProfileTable, StaticSecrets};
    use vs_04_verifier::wiring;

    use crate::fixtures::{self, SharedLedgerConnector};

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn init_code_hex() -> String {
        NATIVE_INIT_CODE.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[tokio::test]
    async fn test_custom_profile_file_drives_a_run() {
        let profiles = write_temp(
            r#"
            [environments.anvil]
            endpoint = "http://127.0.0.1:${ANVIL_PORT}"
            accounts = { source = "node", primary_index = 2, secondary_index = 5 }

            [environments.holesky]
            endpoint = "https://holesky.example/${PROJECT}"
            accounts = { source = "secrets", primary = "OWNER_KEY", secondary = "OTHER_KEY" }
            "#,
        );
        let table = ProfileTable::load(profiles.path()).unwrap();
        assert_eq!(table.names(), vec!["anvil", "holesky"]);

        let connector = Arc::new(SharedLedgerConnector::new(fixtures::devnet()));
        let owner = connector.ledger.dev_accounts()[2];
        let resolver = wiring::resolver(table, Bytes::from(NATIVE_INIT_CODE))
            .with_secrets(Arc::new(StaticSecrets::default().with("ANVIL_PORT", "8546")))
            .with_connector(connector.clone());

        let report = fixtures::orchestrator(resolver, fixtures::fast_config())
            .run("anvil")
            .await;
        assert!(report.passed(), "{report}");
        assert_eq!(connector.endpoints(), vec!["http://127.0.0.1:8546"]);
        // The owner's deployment and rename.
        assert_eq!(
            vs_01_ledger_client::LedgerConnection::get_transaction_count(&connector.ledger, owner)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_builtin_names_absent_from_custom_table() {
        let profiles = write_temp(
            r#"
            [environments.anvil]
            endpoint = "http://127.0.0.1:8545"
            accounts = { source = "node" }
            "#,
        );
        let resolver = EnvironmentResolver::from_file(profiles.path()).unwrap();
        let err = resolver.resolve("sepolia").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported environment `sepolia` (known: anvil)"
        );
    }

    #[test]
    fn test_invalid_profile_files() {
        let missing = ProfileTable::load("/nonexistent/profiles.toml").unwrap_err();
        assert!(matches!(missing, ProfileError::Io { .. }));

        let no_endpoint = write_temp(
            r#"
            [environments.remote]
            accounts = { source = "secrets" }
            "#,
        );
        assert!(matches!(
            ProfileTable::load(no_endpoint.path()),
            Err(ProfileError::MissingEndpoint(name)) if name == "remote"
        ));
    }

    #[tokio::test]
    async fn test_artifact_file_deploys() {
        let artifact = write_temp(&format!(
            r#"{{"abi": [], "bytecode": {{"object": "0x{}"}}}}"#,
            init_code_hex()
        ));
        let artifact = ContractArtifact::load(artifact.path()).unwrap();
        assert_eq!(artifact.bytecode.as_slice(), NATIVE_INIT_CODE);

        let resolver = wiring::resolver(ProfileTable::builtin(), artifact.bytecode.clone());
        let report = wiring::orchestrator(resolver, &artifact, fixtures::fast_config())
            .run("devnet")
            .await;
        assert!(report.passed(), "{report}");
    }
}
