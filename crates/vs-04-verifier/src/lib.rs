//! # VS-04 Verifier - Deployment Verifier & Orchestrator
//!
//! **Subsystem ID:** 4
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Deploys the value store to a named environment and walks the
//! access-control scenario, producing a [`RunReport`] that maps to a process
//! exit code.
//!
//! ## Steps
//!
//! | Step | Checks |
//! |------|--------|
//! | `deployment` | receipt sender is the primary, contract address present, instance balance ≥ funding, primary balance decreased (funding-constrained profiles only) |
//! | `read-after-deploy` | `getName()` equals the initial name |
//! | `owner` | `owner()` equals the primary identity |
//! | `authorized-mutation` | owner `changeName` emits exactly one `NameSet(newName)`; read reflects it |
//! | `unauthorized-mutation` | secondary `changeName` is refused with `NotOwner`; read is unchanged |
//!
//! ## Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Steps run in order, none retried | `service/orchestrator.rs` - `run()` |
//! | A failed step skips all later steps | `domain/report.rs` - `skip_remaining()` |
//! | Mutations wait for confirmation before the next step | `vs_02_value_store::ValueStoreContract::change_name` |
//! | Exit code 0 only when every step passed | `domain/report.rs` - `exit_code()` |
//!
//! ## Usage
//!
//! ```ignore
//! use vs_04_verifier::{wiring, VerifierConfig};
//!
//! let resolver = wiring::resolver(ProfileTable::builtin(), artifact.bytecode.clone());
//! let report = wiring::orchestrator(resolver, &artifact, VerifierConfig::default())
//!     .run("devnet")
//!     .await;
//! std::process::exit(report.exit_code().into());
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod domain;
pub mod errors;
pub mod service;
pub mod wiring;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::{RunReport, Step, StepOutcome, StepReport, VerifierConfig};
    pub use crate::errors::VerificationError;
    pub use crate::service::{DeploymentVerifier, Orchestrator, VerificationContext};
}

pub use domain::{RunReport, Step, StepOutcome, StepReport, VerifierConfig};
pub use errors::VerificationError;
pub use service::{DeploymentVerifier, Orchestrator, VerificationContext};
