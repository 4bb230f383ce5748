//! # Ports Layer (Middle Hexagon)
//!
//! - **Driven Port (Outbound)**: `LedgerConnection`
//! - **Runtime Port**: `NativeProgram` / `ContractState`, hosted by the
//!   in-process ledger
//! - No concrete implementations in this module

pub mod outbound;
pub mod runtime;

pub use outbound::*;
pub use runtime::*;
