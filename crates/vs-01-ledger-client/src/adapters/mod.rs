//! # Adapters Layer (Outer Hexagon)
//!
//! - `JsonRpcConnection`: HTTP JSON-RPC to a ledger node
//! - `InMemoryLedger`: in-process development ledger

pub mod in_memory;
pub mod json_rpc;

pub use in_memory::{InMemoryLedger, InMemoryLedgerConfig, DEVNET_CHAIN_ID};
pub use json_rpc::{HttpSettings, JsonRpcConnection};
