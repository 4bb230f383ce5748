//! # Driven Ports (SPI - Outbound)
//!
//! The ledger connection the rest of the workspace depends on. Adapters
//! implement it over JSON-RPC ([`JsonRpcConnection`](crate::adapters::JsonRpcConnection))
//! or in process ([`InMemoryLedger`](crate::adapters::InMemoryLedger)).

use async_trait::async_trait;
use shared_types::{Address, Bytes, Hash, TransactionReceipt, TransactionRequest, U256};

use crate::errors::ConnectionError;

// =============================================================================
// LEDGER CONNECTION
// =============================================================================

/// A live session with a ledger endpoint.
///
/// Method names follow the `eth_*` JSON-RPC namespace they map to.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Human-readable endpoint description (URL or `in-process`).
    fn endpoint(&self) -> String;

    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64, ConnectionError>;

    /// `eth_blockNumber`: current head.
    async fn block_number(&self) -> Result<u64, ConnectionError>;

    /// `eth_accounts`: accounts the node signs for.
    async fn accounts(&self) -> Result<Vec<Address>, ConnectionError>;

    /// `eth_getBalance` at the head block.
    async fn get_balance(&self, address: Address) -> Result<U256, ConnectionError>;

    /// `eth_getTransactionCount` including pending transactions.
    async fn get_transaction_count(&self, address: Address) -> Result<u64, ConnectionError>;

    /// `eth_gasPrice`.
    async fn gas_price(&self) -> Result<U256, ConnectionError>;

    /// `eth_estimateGas`. Reverts surface as [`ConnectionError::Execution`].
    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ConnectionError>;

    /// `eth_call`: read-only execution at the head block.
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ConnectionError>;

    /// `eth_sendTransaction`: the node signs for `request.from`.
    async fn send_transaction(&self, request: &TransactionRequest)
        -> Result<Hash, ConnectionError>;

    /// `eth_sendRawTransaction`: submits a locally signed transaction.
    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<Hash, ConnectionError>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ConnectionError>;
}
