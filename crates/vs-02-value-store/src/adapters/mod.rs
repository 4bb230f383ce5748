//! # Adapters Layer (Outer Hexagon)
//!
//! - `ValueStoreProgram`: the store hosted natively by the in-process ledger

pub mod native;

pub use native::{ValueStoreProgram, NATIVE_INIT_CODE};
