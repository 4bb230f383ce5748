//! # VS-02 Value Store - Owner-Guarded Name Store
//!
//! **Subsystem ID:** 2
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! A ledger-resident store holding one name, writable only by the account
//! that deployed it. This crate holds the store's rules, its contract
//! interface, a client binding that deploys and drives instances over any
//! ledger connection, and a native program so the in-process ledger can host
//! it without bytecode.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `owner` is set once, at construction | `domain/entities.rs` - no setter exists |
//! | INVARIANT-2 | Only the owner changes `name` | `domain/entities.rs` - `ValueStore::change_name()` |
//! | INVARIANT-3 | Rejection reason is exactly `"NotOwner"` | `errors.rs` - `NOT_OWNER_REASON` |
//! | INVARIANT-4 | One `NameSet` per successful mutation | `service.rs` - `ValueStoreContract::change_name()` |
//!
//! ## Contract Interface
//!
//! | Member | Kind | Encoding |
//! |--------|------|----------|
//! | `constructor(string)` | payable | bytecode ++ abi(string) |
//! | `getName()` | view | returns `string` |
//! | `owner()` | view | returns `address` |
//! | `changeName(string)` | mutation | emits `NameSet(string)` or reverts `Error("NotOwner")` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use vs_02_value_store::prelude::*;
//!
//! let deployment = ValueStoreFactory::new(&artifact)
//!     .deploy(&*connection, &owner, "hossein", U256::from(5))
//!     .await?
//!     .confirm(&*connection, &policy)
//!     .await?;
//! let event = deployment.contract.change_name(&*connection, &owner, "ali").await?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod artifact;
pub mod domain;
pub mod errors;
pub mod events;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{ValueStoreProgram, NATIVE_INIT_CODE};
    pub use crate::artifact::ContractArtifact;
    pub use crate::domain::{StoreCall, ValueStore, ValueStoreInstance};
    pub use crate::errors::{ArtifactError, StoreError, NOT_OWNER_REASON};
    pub use crate::events::ChangeEvent;
    pub use crate::service::{
        Deployment, PendingDeployment, ValueStoreContract, ValueStoreFactory,
    };
}

pub use adapters::{ValueStoreProgram, NATIVE_INIT_CODE};
pub use artifact::ContractArtifact;
pub use errors::{ArtifactError, StoreError};
pub use events::ChangeEvent;
pub use service::{Deployment, PendingDeployment, ValueStoreContract, ValueStoreFactory};
