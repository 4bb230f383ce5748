//! # vs-verify
//!
//! Deploys the value store to one environment and runs the verification
//! steps against it.
//!
//! ```text
//! vs-verify --network devnet
//! vs-verify --network localhost --artifact artifacts/ValueStore.json
//! PRIVATE_KEY=... PRIVATE_KEY2=... INFURA_PROJECT_ID=... \
//!     vs-verify --network sepolia --artifact artifacts/ValueStore.json --confirmations 2
//! ```
//!
//! Exit code 0 when every step passed, 1 otherwise. `RUST_LOG` filters logs.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shared_types::{Bytes, U256};
use vs_02_value_store::{ContractArtifact, NATIVE_INIT_CODE};
use vs_03_environment::ProfileTable;
use vs_04_verifier::{wiring, VerifierConfig};

/// Deploy and verify the owner-guarded value store.
#[derive(Parser, Debug)]
#[command(name = "vs-verify")]
#[command(about = "Deploys the value store and verifies its access control")]
struct Args {
    /// Environment name from the profile table
    #[arg(short, long)]
    network: String,

    /// TOML profile table; the built-in table is used when absent
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Compiled contract artifact (Hardhat or Foundry JSON)
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Confirmation depth for every transaction
    #[arg(long)]
    confirmations: Option<u64>,

    /// Upper bound on each confirmation wait, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Receipt polling interval, in milliseconds
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Constructor argument
    #[arg(long)]
    initial_name: Option<String>,

    /// Name written by the owner
    #[arg(long)]
    new_name: Option<String>,

    /// Wei sent with the deployment
    #[arg(long, value_parser = parse_wei)]
    funding: Option<U256>,
}

fn parse_wei(text: &str) -> Result<U256, String> {
    U256::from_dec_str(text).map_err(|e| format!("invalid wei amount '{text}': {e:?}"))
}

impl Args {
    fn config(&self) -> VerifierConfig {
        let mut config = VerifierConfig::default();
        if let Some(name) = &self.initial_name {
            config.initial_name.clone_from(name);
        }
        if let Some(name) = &self.new_name {
            config.new_name.clone_from(name);
        }
        if let Some(funding) = self.funding {
            config.funding = funding;
        }
        if let Some(confirmations) = self.confirmations {
            config.confirmation.confirmations = confirmations;
        }
        if let Some(secs) = self.timeout_secs {
            config.confirmation.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = self.poll_ms {
            config.confirmation.poll_interval = Duration::from_millis(ms);
        }
        config
    }

    fn profiles(&self) -> Result<ProfileTable> {
        match &self.profiles {
            Some(path) => ProfileTable::load(path)
                .with_context(|| format!("failed to load profiles from {}", path.display())),
            None => Ok(ProfileTable::builtin()),
        }
    }

    fn artifact(&self, profiles: &ProfileTable) -> Result<ContractArtifact> {
        match &self.artifact {
            Some(path) => ContractArtifact::load(path)
                .with_context(|| format!("failed to load artifact {}", path.display())),
            None if wiring::requires_artifact(profiles, &self.network) => {
                bail!("--artifact is required for environment '{}'", self.network)
            }
            None => Ok(ContractArtifact::from_bytecode(Bytes::from(NATIVE_INIT_CODE))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = args.config();
    let profiles = args.profiles()?;
    let artifact = args.artifact(&profiles)?;

    info!(
        network = %args.network,
        confirmations = config.confirmation.confirmations,
        timeout_secs = config.confirmation.timeout.as_secs(),
        "starting verification"
    );

    let resolver = wiring::resolver(profiles, artifact.bytecode.clone());
    let report = wiring::orchestrator(resolver, &artifact, config)
        .run(&args.network)
        .await;

    println!("{report}");
    if !report.passed() {
        warn!(network = %args.network, "verification failed");
    }
    Ok(ExitCode::from(report.exit_code()))
}
