//! # Environment Profiles
//!
//! The endpoint table is external configuration: a TOML document of
//! `[environments.<name>]` entries.
//!
//! ```toml
//! [environments.localhost]
//! endpoint = "http://localhost:8545"
//! accounts = { source = "node" }
//!
//! [environments.sepolia]
//! endpoint = "https://sepolia.infura.io/v3/${INFURA_PROJECT_ID}"
//! accounts = { source = "secrets", primary = "PRIVATE_KEY", secondary = "PRIVATE_KEY2" }
//!
//! [environments.devnet]
//! accounts = { source = "in-process" }
//! ```
//!
//! `funding_constrained` defaults to `true` for `secrets` profiles and
//! `false` otherwise.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ProfileError;

/// Loopback endpoint of a local development node.
pub const LOCAL_ENDPOINT: &str = "http://localhost:8545";

/// Remote test ledger gateway.
pub const SEPOLIA_ENDPOINT: &str = "https://sepolia.infura.io/v3/${INFURA_PROJECT_ID}";

pub const PRIMARY_SECRET: &str = "PRIVATE_KEY";
pub const SECONDARY_SECRET: &str = "PRIVATE_KEY2";

fn default_primary_index() -> usize {
    0
}

fn default_secondary_index() -> usize {
    1
}

fn default_primary_secret() -> String {
    PRIMARY_SECRET.to_string()
}

fn default_secondary_secret() -> String {
    SECONDARY_SECRET.to_string()
}

/// Where an environment's identities come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum AccountSource {
    /// Accounts the node manages, by index into `eth_accounts`.
    Node {
        #[serde(default = "default_primary_index")]
        primary_index: usize,
        #[serde(default = "default_secondary_index")]
        secondary_index: usize,
    },
    /// Wallets built from two named secret variables.
    Secrets {
        #[serde(default = "default_primary_secret")]
        primary: String,
        #[serde(default = "default_secondary_secret")]
        secondary: String,
    },
    /// Development accounts of an in-process ledger.
    InProcess {
        #[serde(default = "default_primary_index")]
        primary_index: usize,
        #[serde(default = "default_secondary_index")]
        secondary_index: usize,
    },
}

impl AccountSource {
    /// Default account indices of a node pool.
    #[must_use]
    pub fn node() -> Self {
        Self::Node {
            primary_index: default_primary_index(),
            secondary_index: default_secondary_index(),
        }
    }

    /// `PRIVATE_KEY` / `PRIVATE_KEY2`.
    #[must_use]
    pub fn secrets() -> Self {
        Self::Secrets {
            primary: default_primary_secret(),
            secondary: default_secondary_secret(),
        }
    }

    /// Default account indices of an in-process ledger.
    #[must_use]
    pub fn in_process() -> Self {
        Self::InProcess {
            primary_index: default_primary_index(),
            secondary_index: default_secondary_index(),
        }
    }

    fn needs_endpoint(&self) -> bool {
        !matches!(self, Self::InProcess { .. })
    }

    fn distinct(&self) -> bool {
        match self {
            Self::Node {
                primary_index,
                secondary_index,
            }
            | Self::InProcess {
                primary_index,
                secondary_index,
            } => primary_index != secondary_index,
            Self::Secrets { primary, secondary } => primary != secondary,
        }
    }
}

/// A named execution environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentProfile {
    pub name: String,
    /// Endpoint template, possibly containing `${VAR}` placeholders.
    pub endpoint: Option<String>,
    pub accounts: AccountSource,
    /// Whether deployment costs must visibly reduce the deployer's balance.
    pub funding_constrained: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileEntry {
    #[serde(default)]
    endpoint: Option<String>,
    accounts: AccountSource,
    #[serde(default)]
    funding_constrained: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    environments: BTreeMap<String, ProfileEntry>,
}

/// Environment profiles by name.
#[derive(Debug, Clone, Default)]
pub struct ProfileTable {
    profiles: BTreeMap<String, EnvironmentProfile>,
}

impl ProfileTable {
    /// `localhost`, `sepolia` and `devnet`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert(EnvironmentProfile {
            name: "localhost".into(),
            endpoint: Some(LOCAL_ENDPOINT.into()),
            accounts: AccountSource::node(),
            funding_constrained: false,
        });
        table.insert(EnvironmentProfile {
            name: "sepolia".into(),
            endpoint: Some(SEPOLIA_ENDPOINT.into()),
            accounts: AccountSource::secrets(),
            funding_constrained: true,
        });
        table.insert(EnvironmentProfile {
            name: "devnet".into(),
            endpoint: None,
            accounts: AccountSource::in_process(),
            funding_constrained: false,
        });
        table
    }

    /// Parses a TOML profile table.
    pub fn from_toml(text: &str) -> Result<Self, ProfileError> {
        let document: ProfileDocument = toml::from_str(text)?;
        let mut table = Self::default();
        for (name, entry) in document.environments {
            if entry.endpoint.is_none() && entry.accounts.needs_endpoint() {
                return Err(ProfileError::MissingEndpoint(name));
            }
            if !entry.accounts.distinct() {
                return Err(ProfileError::SameIdentity(name));
            }
            let funding_constrained = entry
                .funding_constrained
                .unwrap_or(matches!(entry.accounts, AccountSource::Secrets { .. }));
            table.insert(EnvironmentProfile {
                name,
                endpoint: entry.endpoint,
                accounts: entry.accounts,
                funding_constrained,
            });
        }
        Ok(table)
    }

    /// Reads and parses a TOML profile table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Adds or replaces a profile.
    pub fn insert(&mut self, profile: EnvironmentProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnvironmentProfile> {
        self.profiles.get(name)
    }

    /// Profile names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}
