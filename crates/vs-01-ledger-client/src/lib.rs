//! # VS-01 Ledger Client - Ledger Connection Subsystem
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Everything the verifier needs to talk to a ledger: a connection port with
//! JSON-RPC and in-process adapters, identities that either sign locally or
//! delegate signing to the node, and a confirmation wait with an explicit
//! timeout.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Replay protection: signed transactions commit to the chain id | `domain/transaction.rs` - `LegacyTransaction::signing_hash()` |
//! | INVARIANT-2 | Low-S signatures only | `domain/identity.rs` - `Wallet::sign_hash()` |
//! | INVARIANT-3 | Reverted transactions leave no state behind | `adapters/in_memory.rs` - copy-on-write execution |
//! | INVARIANT-4 | Confirmation waits are bounded | `service.rs` - `wait_for_confirmation()` |
//!
//! ## Ledger RPC Surface
//!
//! | Method | Port Operation |
//! |--------|----------------|
//! | `eth_chainId` | `chain_id()` |
//! | `eth_blockNumber` | `block_number()` |
//! | `eth_accounts` | `accounts()` |
//! | `eth_getBalance` | `get_balance()` |
//! | `eth_getTransactionCount` | `get_transaction_count()` |
//! | `eth_gasPrice` | `gas_price()` |
//! | `eth_estimateGas` | `estimate_gas()` |
//! | `eth_call` | `call()` |
//! | `eth_sendTransaction` | `send_transaction()` |
//! | `eth_sendRawTransaction` | `send_raw_transaction()` |
//! | `eth_getTransactionReceipt` | `get_transaction_receipt()` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use vs_01_ledger_client::prelude::*;
//!
//! let ledger = InMemoryLedger::default();
//! let sender = Identity::node_managed(ledger.dev_accounts()[0]);
//! let tx_hash = submit_transaction(&ledger, &sender, request).await?;
//! let receipt = wait_for_confirmation(&ledger, tx_hash, &ConfirmationPolicy::default()).await?;
//! ```

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
    // Domain
    pub use crate::domain::identity::{Identity, RecoverableSignature, Wallet};
    pub use crate::domain::services::{compute_contract_address, intrinsic_gas};
    pub use crate::domain::transaction::{LegacyTransaction, SignedLegacyTransaction};

    // Ports
    pub use crate::ports::outbound::LedgerConnection;
    pub use crate::ports::runtime::{
        CallContext, ContractState, ExecutionOutput, NativeProgram, Revert,
    };

    // Adapters
    pub use crate::adapters::{
        HttpSettings, InMemoryLedger, InMemoryLedgerConfig, JsonRpcConnection, DEVNET_CHAIN_ID,
    };

    // Service
    pub use crate::service::{submit_transaction, wait_for_confirmation, ConfirmationPolicy};

    // Errors
    pub use crate::errors::{ConnectionError, WalletError};
}

pub use adapters::{InMemoryLedger, InMemoryLedgerConfig, JsonRpcConnection};
pub use domain::identity::{Identity, Wallet};
pub use errors::{ConnectionError, WalletError};
pub use ports::outbound::LedgerConnection;
pub use service::{submit_transaction, wait_for_confirmation, ConfirmationPolicy};
