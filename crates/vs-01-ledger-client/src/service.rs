//! # Transaction Service
//!
//! Submission and confirmation of transactions over any
//! [`LedgerConnection`].
//!
//! ## Flow
//!
//! ```text
//! submit_transaction ──► Identity has wallet? ──yes──► fill nonce/gas/chain ──► sign ──► eth_sendRawTransaction
//!                                 │
//!                                 no ──► eth_sendTransaction {from}
//!
//! wait_for_confirmation ──► poll receipt + head every `poll_interval`
//!                           until depth ≥ `confirmations`, bounded by `timeout`
//! ```

use std::time::Duration;

use shared_types::{Hash, TransactionReceipt, TransactionRequest};
use tokio::time::{timeout, Instant};
use tracing::{debug, info, instrument};

use crate::domain::identity::Identity;
use crate::domain::transaction::LegacyTransaction;
use crate::errors::ConnectionError;
use crate::ports::outbound::LedgerConnection;

/// How long and how deep to wait for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Required depth; the inclusion block counts as one.
    pub confirmations: u64,
    /// Upper bound on the whole wait.
    pub timeout: Duration,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Sends `request` as `identity`.
///
/// Wallet identities sign locally; `nonce`, `gas_price` and `gas` are filled
/// from the ledger when the request leaves them unset. Node-managed identities
/// delegate signing to the node.
#[instrument(skip(connection, request), fields(from = %identity.address()))]
pub async fn submit_transaction(
    connection: &dyn LedgerConnection,
    identity: &Identity,
    request: TransactionRequest,
) -> Result<Hash, ConnectionError> {
    let request = request.with_from(identity.address());

    let Some(wallet) = identity.wallet() else {
        let tx_hash = connection.send_transaction(&request).await?;
        debug!(tx = %tx_hash, "submitted node-signed transaction");
        return Ok(tx_hash);
    };

    let chain_id = connection.chain_id().await?;
    let nonce = match request.nonce {
        Some(nonce) => nonce,
        None => connection.get_transaction_count(wallet.address()).await?,
    };
    let gas_price = match request.gas_price {
        Some(price) => price,
        None => connection.gas_price().await?,
    };
    let gas_limit = match request.gas {
        Some(gas) => gas,
        None => connection.estimate_gas(&request).await?,
    };

    let tx = LegacyTransaction {
        nonce,
        gas_price,
        gas_limit,
        to: request.to,
        value: request.value_or_zero(),
        data: request.data.clone().unwrap_or_default(),
    };
    let raw = tx.sign(wallet, chain_id)?;
    let tx_hash = connection.send_raw_transaction(&raw).await?;
    debug!(tx = %tx_hash, nonce, gas_limit, chain_id, "submitted signed transaction");
    Ok(tx_hash)
}

/// Blocks until `tx_hash` is included and buried `policy.confirmations`
/// deep, or fails with [`ConnectionError::ConfirmationTimeout`].
///
/// A depth of zero is treated as one: the receipt must exist.
#[instrument(skip(connection, policy), fields(confirmations = policy.confirmations))]
pub async fn wait_for_confirmation(
    connection: &dyn LedgerConnection,
    tx_hash: Hash,
    policy: &ConfirmationPolicy,
) -> Result<TransactionReceipt, ConnectionError> {
    let depth = policy.confirmations.max(1);
    let started = Instant::now();

    match timeout(policy.timeout, poll_receipt(connection, tx_hash, depth, policy.poll_interval)).await {
        Ok(result) => {
            let receipt = result?;
            info!(
                tx = %tx_hash,
                block = receipt.block_number,
                waited_ms = started.elapsed().as_millis() as u64,
                "transaction confirmed"
            );
            Ok(receipt)
        }
        Err(_) => Err(ConnectionError::ConfirmationTimeout {
            tx_hash,
            confirmations: depth,
            waited_ms: started.elapsed().as_millis() as u64,
        }),
    }
}

async fn poll_receipt(
    connection: &dyn LedgerConnection,
    tx_hash: Hash,
    depth: u64,
    poll_interval: Duration,
) -> Result<TransactionReceipt, ConnectionError> {
    loop {
        if let Some(receipt) = connection.get_transaction_receipt(tx_hash).await? {
            let head = connection.block_number().await?;
            if receipt.confirmations(head) >= depth {
                return Ok(receipt);
            }
            debug!(
                tx = %tx_hash,
                have = receipt.confirmations(head),
                want = depth,
                "waiting for confirmations"
            );
        }
        tokio::time::sleep(poll_interval).await;
    }
}
