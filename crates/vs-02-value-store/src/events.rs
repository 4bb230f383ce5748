//! # Change Events
//!
//! `NameSet(string)`: emitted exactly once per successful authorized
//! mutation, never on a rejected one.

use shared_types::{abi, AbiError, Address, Hash, Log};

use crate::domain::codec::NAME_SET_EVENT;

/// A successful name change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub new_name: String,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(new_name: impl Into<String>) -> Self {
        Self {
            new_name: new_name.into(),
        }
    }

    /// Topic-0 of the on-ledger log.
    #[must_use]
    pub fn topic() -> Hash {
        abi::event_topic(NAME_SET_EVENT)
    }

    /// The log a contract at `emitter` writes for this event.
    #[must_use]
    pub fn to_log(&self, emitter: Address) -> Log {
        Log::new(
            emitter,
            vec![Self::topic()],
            abi::encode_string(&self.new_name).into(),
        )
    }

    /// Decodes `log` if it is a `NameSet` event. Logs with another signature
    /// yield `Ok(None)`.
    pub fn from_log(log: &Log) -> Result<Option<Self>, AbiError> {
        if log.signature() != Some(Self::topic()) {
            return Ok(None);
        }
        let new_name = abi::decode_string(log.data.as_slice())?;
        Ok(Some(Self { new_name }))
    }

    /// All `NameSet` events emitted by `emitter` among `logs`.
    pub fn collect(logs: &[Log], emitter: Address) -> Result<Vec<Self>, AbiError> {
        let mut events = Vec::new();
        for log in logs.iter().filter(|log| log.address == emitter) {
            if let Some(event) = Self::from_log(log)? {
                events.push(event);
            }
        }
        Ok(events)
    }
}
