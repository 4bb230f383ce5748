//! Domain layer: the store entity and its contract interface.

pub mod codec;
pub mod entities;

pub use codec::{deployment_payload, StoreCall};
pub use entities::{ValueStore, ValueStoreInstance};
