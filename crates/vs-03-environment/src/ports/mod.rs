//! # Ports Layer (Middle Hexagon)
//!
//! - **Driven Ports (Outbound)**: `SecretSource`, `Connector`
//! - **Strategy Port**: `EnvironmentStrategy`, one implementation per
//!   account source
//! - No concrete implementations in this module

pub mod outbound;
pub mod strategy;

pub use outbound::*;
pub use strategy::*;
