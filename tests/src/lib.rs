//! # Value-Store Verifier Test Suite
//!
//! Unified test crate. Every suite runs against the in-process ledger, so
//! nothing here needs a node or credentials.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs             # Ledgers, connectors and resolvers shared by the suites
//! └── integration/
//!     ├── scenarios.rs        # Deploy, owner rename, non-owner rename, missing secret
//!     ├── remote_strategy.rs  # Secret-wallet environments wired to an in-process ledger
//!     ├── properties.rs       # Owner-guard properties (proptest)
//!     └── profiles.rs         # Profile files and artifact files on disk
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vs-tests
//! cargo test -p vs-tests integration::properties::
//! ```

pub mod fixtures;
pub mod integration;
