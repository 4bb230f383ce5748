//! # VS-03 Environment - Identity & Connection Resolver
//!
//! **Subsystem ID:** 3
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Turns an environment name into a live ledger connection plus a primary
//! (owner candidate) and secondary (non-owner) identity. Each profile in the
//! endpoint table names an account source, and each account source has its
//! own strategy; nothing branches on environment names.
//!
//! ## Account Sources
//!
//! | Source | Example profile | Endpoint | Identities | Funding constrained |
//! |--------|-----------------|----------|------------|---------------------|
//! | `node` | `localhost` | `http://localhost:8545` | node accounts 0 and 1 | no |
//! | `secrets` | `sepolia` | `https://sepolia.infura.io/v3/${INFURA_PROJECT_ID}` | wallets from `PRIVATE_KEY`, `PRIVATE_KEY2` | yes |
//! | `in-process` | `devnet` | none | dev accounts 0 and 1 | no |
//!
//! ## Failure Modes
//!
//! | Error | When | Connection attempted? |
//! |-------|------|-----------------------|
//! | `ResolveError::UnsupportedEnvironment` | name matches no profile | no |
//! | `ResolveError::Configuration` | secret or credential absent, empty or malformed | no |
//! | `ResolveError::Configuration` | fewer pool accounts than selected | yes |
//! | `ResolveError::Connection` | endpoint unreachable or failing | yes |

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{
        HttpConnector, InProcessStrategy, LedgerFactory, NodeAccountsStrategy, ProcessEnv,
        SecretWalletStrategy, StaticSecrets,
    };
    pub use crate::domain::{AccountSource, EnvironmentProfile, ProfileTable};
    pub use crate::errors::{ConfigurationError, ProfileError, ResolveError};
    pub use crate::ports::{Connector, EnvironmentStrategy, IdentityPair, SecretSource};
    pub use crate::service::{EnvironmentResolver, ResolvedEnvironment};
}

pub use adapters::{LedgerFactory, ProcessEnv, StaticSecrets};
pub use domain::{AccountSource, EnvironmentProfile, ProfileTable};
pub use errors::{ConfigurationError, ProfileError, ResolveError};
pub use ports::{Connector, SecretSource};
pub use service::{EnvironmentResolver, ResolvedEnvironment};
