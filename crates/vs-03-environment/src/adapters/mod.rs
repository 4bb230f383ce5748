//! # Adapters Layer (Outer Hexagon)
//!
//! - Secret sources: `ProcessEnv`, `StaticSecrets`
//! - `HttpConnector`: JSON-RPC connections
//! - One `EnvironmentStrategy` per account source

pub mod connector;
pub mod secrets;
pub mod strategies;

pub use connector::HttpConnector;
pub use secrets::{ProcessEnv, StaticSecrets};
pub use strategies::{
    InProcessStrategy, LedgerFactory, NodeAccountsStrategy, SecretWalletStrategy,
};
