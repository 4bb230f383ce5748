//! # Value Store Entity
//!
//! ```text
//!             deploy(name, owner)
//!   (none) ─────────────────────────► Deployed{owner, name}
//!                                        │  ▲
//!                                        └──┘ changeName(new) [caller == owner]
//! ```
//!
//! `owner` is set exactly once, at creation. `name` changes only through a
//! call whose caller equals `owner`.

use shared_types::{Address, U256};

use crate::errors::StoreError;
use crate::events::ChangeEvent;

/// The store's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStore {
    owner: Address,
    name: String,
}

impl ValueStore {
    /// State right after construction by `owner`.
    #[must_use]
    pub fn new(owner: Address, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the name if `caller` is the owner.
    pub fn change_name(
        &mut self,
        caller: Address,
        new_name: impl Into<String>,
    ) -> Result<ChangeEvent, StoreError> {
        if caller != self.owner {
            return Err(StoreError::NotOwner { caller });
        }
        self.name = new_name.into();
        Ok(ChangeEvent::new(self.name.clone()))
    }
}

/// Snapshot of a deployed instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStoreInstance {
    pub address: Address,
    pub owner: Address,
    pub name: String,
    pub balance: U256,
}
