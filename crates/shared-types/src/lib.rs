//! # Shared Types Crate
//!
//! Ledger primitives shared by every crate in the verifier workspace:
//! addresses, hashes, byte strings, balances, logs, transaction requests and
//! receipts, plus Keccak-256 and the contract ABI subset the verifier needs.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: types that cross crate seams live here.
//! - **Wire Shape**: every type serializes to the JSON-RPC form a ledger node
//!   speaks (`0x`-prefixed hex, camelCase keys), so adapters pass them through
//!   without conversion.

pub mod abi;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod quantity;
pub mod value_objects;

pub use entities::{Log, TransactionReceipt, TransactionRequest};
pub use errors::{AbiError, HexError};
pub use hashing::keccak256;
pub use value_objects::{decode_hex, ether, Address, Bytes, Hash, U256, WEI_PER_ETHER};
