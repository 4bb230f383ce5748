//! # Driven Ports (SPI - Outbound)

use vs_01_ledger_client::{ConnectionError, LedgerConnection};

/// Source of named secrets and credentials.
pub trait SecretSource: Send + Sync {
    /// Raw value of `name`, if set.
    fn get(&self, name: &str) -> Option<String>;

    /// Value of `name`; empty or whitespace-only values count as absent.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Opens ledger connections for resolved endpoints.
pub trait Connector: Send + Sync {
    /// Connects to `endpoint`. Must not block on I/O.
    fn connect(&self, endpoint: &str) -> Result<Box<dyn LedgerConnection>, ConnectionError>;
}
