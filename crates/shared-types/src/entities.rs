//! # Ledger Entities
//!
//! Transaction requests, receipts and logs in their JSON-RPC shape. These are
//! the collaborator contract between the verifier and any ledger endpoint.

use serde::{Deserialize, Serialize};

use crate::quantity;
use crate::value_objects::{Address, Bytes, Hash, U256};

/// A log emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics; `topics[0]` is the event signature hash.
    pub topics: Vec<Hash>,
    /// ABI-encoded non-indexed arguments.
    pub data: Bytes,
    /// Block that included the log.
    #[serde(default, with = "quantity::option", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Transaction that produced the log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<Hash>,
    /// Position of the log in the block.
    #[serde(default, with = "quantity::option", skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
}

impl Log {
    /// Creates a log that is not yet attached to a block.
    #[must_use]
    pub fn new(address: Address, topics: Vec<Hash>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
            block_number: None,
            transaction_hash: None,
            log_index: None,
        }
    }

    /// Event signature hash, if present.
    #[must_use]
    pub fn signature(&self) -> Option<Hash> {
        self.topics.first().copied()
    }
}

/// Parameters for `eth_call`, `eth_estimateGas` and `eth_sendTransaction`.
///
/// `to == None` is a contract creation; `data` then holds the init code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(
        default,
        with = "quantity::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(
        default,
        with = "quantity::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub nonce: Option<u64>,
}

impl TransactionRequest {
    /// A contract creation carrying `init_code` and `value`.
    #[must_use]
    pub fn create(init_code: Bytes, value: U256) -> Self {
        Self {
            value: Some(value),
            data: Some(init_code),
            ..Self::default()
        }
    }

    /// A message call to `to` with `data`.
    #[must_use]
    pub fn call(to: Address, data: Bytes) -> Self {
        Self {
            to: Some(to),
            data: Some(data),
            ..Self::default()
        }
    }

    /// Sets the sender.
    #[must_use]
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Returns true for contract creation.
    #[must_use]
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }

    /// Value carried, zero when absent.
    #[must_use]
    pub fn value_or_zero(&self) -> U256 {
        self.value.unwrap_or_default()
    }

    /// Calldata or init code, empty when absent.
    #[must_use]
    pub fn data_or_empty(&self) -> &[u8] {
        self.data.as_ref().map_or(&[][..], Bytes::as_slice)
    }
}

/// Receipt of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: Hash,
    #[serde(with = "quantity")]
    pub block_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Hash>,
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    /// Set for contract creations.
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// 1 on success, 0 on failure (post-Byzantium).
    #[serde(default, with = "quantity::option")]
    pub status: Option<u64>,
    #[serde(default)]
    pub gas_used: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<U256>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    /// Returns true when the transaction executed successfully.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == Some(1)
    }

    /// Number of blocks, including the inclusion block, on top of which the
    /// receipt sits at chain height `head`.
    #[must_use]
    pub fn confirmations(&self, head: u64) -> u64 {
        if head < self.block_number {
            0
        } else {
            head - self.block_number + 1
        }
    }
}
