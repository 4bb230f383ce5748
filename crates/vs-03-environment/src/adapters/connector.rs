//! Connector opening JSON-RPC connections.

use vs_01_ledger_client::adapters::HttpSettings;
use vs_01_ledger_client::{ConnectionError, JsonRpcConnection, LedgerConnection};

/// Opens a [`JsonRpcConnection`] per endpoint.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    settings: HttpSettings,
}

impl HttpConnector {
    #[must_use]
    pub fn new(settings: HttpSettings) -> Self {
        Self { settings }
    }
}

impl crate::ports::outbound::Connector for HttpConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn LedgerConnection>, ConnectionError> {
        Ok(Box::new(JsonRpcConnection::with_settings(
            endpoint,
            &self.settings,
        )?))
    }
}
