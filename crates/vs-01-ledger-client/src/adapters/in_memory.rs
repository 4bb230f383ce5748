//! # In-Process Ledger
//!
//! A single-node ledger held in memory, used by the `devnet` profile and by
//! the test suites. It speaks the same [`LedgerConnection`] port as a remote
//! node:
//!
//! - prefunded development accounts the "node" signs for
//! - locally signed EIP-155 raw transactions with nonce and chain-id checks
//! - contracts as [`NativeProgram`]s registered against an init-code prefix
//! - one block per transaction (automine), or manual mining via [`InMemoryLedger::mine`]
//!
//! Every transaction executes against a copy of the state; a revert
//! discards the copy and the transaction is rejected without being mined.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rlp::RlpStream;
use shared_types::{
    ether, keccak256, Address, Bytes, Hash, TransactionReceipt, TransactionRequest, U256,
};
use tracing::{debug, info, instrument};

use crate::domain::identity::Wallet;
use crate::domain::services::{compute_contract_address, intrinsic_gas, max_cost};
use crate::domain::transaction::{LegacyTransaction, SignedLegacyTransaction};
use crate::errors::ConnectionError;
use crate::ports::outbound::LedgerConnection;
use crate::ports::runtime::{CallContext, ContractState, ExecutionOutput, NativeProgram};

/// Chain id of the in-process ledger, shared with common local dev nodes.
pub const DEVNET_CHAIN_ID: u64 = 31_337;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// In-process ledger configuration.
#[derive(Debug, Clone)]
pub struct InMemoryLedgerConfig {
    pub chain_id: u64,
    /// Number of prefunded development accounts.
    pub account_count: usize,
    pub initial_balance: U256,
    pub gas_price: U256,
    pub block_gas_limit: u64,
    /// Flat gas charged on top of intrinsic gas when a program executes.
    pub execution_gas: u64,
    /// Mine a block for every accepted transaction.
    pub automine: bool,
}

impl Default for InMemoryLedgerConfig {
    fn default() -> Self {
        Self {
            chain_id: DEVNET_CHAIN_ID,
            account_count: 10,
            initial_balance: ether(10_000),
            gas_price: U256::from(1_000_000_000u64),
            block_gas_limit: 30_000_000,
            execution_gas: 25_000,
            automine: true,
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Account {
    balance: U256,
    nonce: u64,
}

#[derive(Debug, Clone, Default)]
struct State {
    head: u64,
    accounts: HashMap<Address, Account>,
    contracts: HashMap<Address, Box<dyn ContractState>>,
}

impl State {
    fn account_mut(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }

    fn balance(&self, address: Address) -> U256 {
        self.accounts
            .get(&address)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    fn nonce(&self, address: Address) -> u64 {
        self.accounts.get(&address).map_or(0, |a| a.nonce)
    }
}

/// A message to execute: the part of a transaction programs see.
#[derive(Debug, Clone)]
struct Message {
    from: Address,
    to: Option<Address>,
    value: U256,
    data: Bytes,
}

#[derive(Debug)]
struct Outcome {
    created: Option<Address>,
    output: ExecutionOutput,
    executed_code: bool,
}

struct Inner {
    config: InMemoryLedgerConfig,
    dev_secrets: Vec<[u8; 32]>,
    dev_accounts: Vec<Address>,
    state: RwLock<State>,
    receipts: RwLock<HashMap<Hash, TransactionReceipt>>,
    pending: RwLock<Vec<TransactionReceipt>>,
    programs: RwLock<Vec<(Bytes, Arc<dyn NativeProgram>)>>,
}

/// Cloneable handle to an in-process ledger; clones share state.
#[derive(Clone)]
pub struct InMemoryLedger {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("chain_id", &self.inner.config.chain_id)
            .field("head", &self.inner.state.read().head)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(InMemoryLedgerConfig::default())
    }
}

impl InMemoryLedger {
    /// Creates a ledger at block 0 with funded development accounts.
    #[must_use]
    pub fn new(config: InMemoryLedgerConfig) -> Self {
        let mut dev_secrets = Vec::with_capacity(config.account_count);
        let mut dev_accounts = Vec::with_capacity(config.account_count);
        let mut state = State::default();

        let mut seed = 0u64;
        while dev_accounts.len() < config.account_count {
            let secret = keccak256(format!("value-store devnet account {seed}").as_bytes()).0;
            seed += 1;
            // A hash outside the curve order is skipped.
            if let Ok(wallet) = Wallet::from_secret_bytes(secret) {
                state.account_mut(wallet.address()).balance = config.initial_balance;
                dev_secrets.push(secret);
                dev_accounts.push(wallet.address());
            }
        }

        info!(
            chain_id = config.chain_id,
            accounts = dev_accounts.len(),
            "in-process ledger started"
        );

        Self {
            inner: Arc::new(Inner {
                config,
                dev_secrets,
                dev_accounts,
                state: RwLock::new(state),
                receipts: RwLock::new(HashMap::new()),
                pending: RwLock::new(Vec::new()),
                programs: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Registers `program` for creation transactions whose data starts with
    /// `init_code_prefix`. The longest matching prefix wins.
    pub fn register_program(&self, init_code_prefix: Bytes, program: Arc<dyn NativeProgram>) {
        debug!(program = program.name(), prefix = %init_code_prefix.to_hex(), "program registered");
        self.inner
            .programs
            .write()
            .push((init_code_prefix, program));
    }

    /// Accounts the ledger signs for, in index order.
    #[must_use]
    pub fn dev_accounts(&self) -> &[Address] {
        &self.inner.dev_accounts
    }

    /// Hex secret of development account `index`, for wallet-based flows.
    #[must_use]
    pub fn dev_secret(&self, index: usize) -> Option<String> {
        self.inner
            .dev_secrets
            .get(index)
            .map(|secret| format!("0x{}", hex::encode(secret)))
    }

    /// The ledger configuration.
    #[must_use]
    pub fn config(&self) -> &InMemoryLedgerConfig {
        &self.inner.config
    }

    /// Overwrites the balance of `address`.
    pub fn set_balance(&self, address: Address, balance: U256) {
        self.inner.state.write().account_mut(address).balance = balance;
    }

    /// Current head block.
    #[must_use]
    pub fn head(&self) -> u64 {
        self.inner.state.read().head
    }

    /// Mines `blocks` blocks; pending transactions go into the first one.
    pub fn mine(&self, blocks: u64) {
        if blocks == 0 {
            return;
        }
        let mut state = self.inner.state.write();
        let pending: Vec<TransactionReceipt> = std::mem::take(&mut *self.inner.pending.write());
        state.head += 1;
        let first = state.head;
        state.head += blocks - 1;
        let mut receipts = self.inner.receipts.write();
        for receipt in pending {
            let receipt = seal(receipt, first);
            receipts.insert(receipt.transaction_hash, receipt);
        }
        debug!(head = state.head, "mined {} block(s)", blocks);
    }

    fn find_program(&self, data: &[u8]) -> Option<(usize, Arc<dyn NativeProgram>)> {
        self.inner
            .programs
            .read()
            .iter()
            .filter(|(prefix, _)| !prefix.is_empty() && data.starts_with(prefix.as_slice()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, program)| (prefix.len(), Arc::clone(program)))
    }

    /// Executes `msg` against `state`, transferring value and running code.
    fn run(&self, state: &mut State, msg: &Message, is_static: bool) -> Result<Outcome, ConnectionError> {
        let available = state.balance(msg.from);
        if available < msg.value {
            return Err(ConnectionError::InsufficientFunds {
                address: msg.from,
                required: msg.value,
                available,
            });
        }

        match msg.to {
            None => {
                let (prefix_len, program) =
                    self.find_program(msg.data.as_slice()).ok_or_else(|| {
                        ConnectionError::InvalidTransaction(
                            "init code matches no registered program".into(),
                        )
                    })?;
                let address = compute_contract_address(msg.from, state.nonce(msg.from));
                let ctx = CallContext {
                    caller: msg.from,
                    contract: address,
                    value: msg.value,
                    is_static,
                };
                let instance = program
                    .instantiate(&ctx, &msg.data.as_slice()[prefix_len..])
                    .map_err(revert_error)?;
                transfer(state, msg.from, address, msg.value);
                state.contracts.insert(address, instance);
                debug!(program = program.name(), %address, "contract created");
                Ok(Outcome {
                    created: Some(address),
                    output: ExecutionOutput::default(),
                    executed_code: true,
                })
            }
            Some(to) => {
                transfer(state, msg.from, to, msg.value);
                let ctx = CallContext {
                    caller: msg.from,
                    contract: to,
                    value: msg.value,
                    is_static,
                };
                match state.contracts.get_mut(&to) {
                    Some(contract) => {
                        let output = contract
                            .execute(&ctx, msg.data.as_slice())
                            .map_err(revert_error)?;
                        Ok(Outcome {
                            created: None,
                            output,
                            executed_code: true,
                        })
                    }
                    None => Ok(Outcome {
                        created: None,
                        output: ExecutionOutput::default(),
                        executed_code: false,
                    }),
                }
            }
        }
    }

    fn gas_for(&self, msg: &Message, outcome: &Outcome) -> u64 {
        let execution = if outcome.executed_code {
            self.inner.config.execution_gas
        } else {
            0
        };
        intrinsic_gas(msg.data.as_slice(), msg.to.is_none()) + execution
    }

    /// Validates, executes and records a transaction from `from`.
    fn apply(
        &self,
        tx: &LegacyTransaction,
        from: Address,
        tx_hash: Hash,
    ) -> Result<Hash, ConnectionError> {
        if self.inner.receipts.read().contains_key(&tx_hash) {
            return Err(ConnectionError::InvalidTransaction(
                "already known".into(),
            ));
        }

        let mut state = self.inner.state.write();
        let expected_nonce = state.nonce(from);
        if tx.nonce != expected_nonce {
            return Err(ConnectionError::InvalidTransaction(format!(
                "nonce mismatch for {from}: expected {expected_nonce}, got {}",
                tx.nonce
            )));
        }

        if tx.gas_limit > self.inner.config.block_gas_limit {
            return Err(ConnectionError::InvalidTransaction(format!(
                "gas limit {} exceeds block gas limit {}",
                tx.gas_limit, self.inner.config.block_gas_limit
            )));
        }

        let available = state.balance(from);
        let required = max_cost(tx.value, tx.gas_limit, tx.gas_price);
        if available < required {
            return Err(ConnectionError::InsufficientFunds {
                address: from,
                required,
                available,
            });
        }

        let msg = Message {
            from,
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
        };
        let mut working = state.clone();
        let outcome = self.run(&mut working, &msg, false)?;
        let gas_used = self.gas_for(&msg, &outcome);
        if gas_used > tx.gas_limit {
            return Err(ConnectionError::InvalidTransaction(format!(
                "out of gas: needs {gas_used}, limit {}",
                tx.gas_limit
            )));
        }

        let fee = tx.gas_price.saturating_mul(U256::from(gas_used));
        let sender = working.account_mut(from);
        sender.balance = sender.balance.saturating_sub(fee);
        sender.nonce += 1;
        *state = working;

        let receipt = TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: 0,
            block_hash: None,
            from,
            to: tx.to,
            contract_address: outcome.created,
            status: Some(1),
            gas_used: U256::from(gas_used),
            effective_gas_price: Some(tx.gas_price),
            logs: outcome.output.logs,
        };
        info!(tx = %tx_hash, %from, gas_used, "transaction accepted");

        if self.inner.config.automine {
            state.head += 1;
            let receipt = seal(receipt, state.head);
            self.inner.receipts.write().insert(tx_hash, receipt);
        } else {
            self.inner.pending.write().push(receipt);
        }
        Ok(tx_hash)
    }

    /// Read-only execution against a copy of the head state.
    fn simulate(&self, request: &TransactionRequest, is_static: bool) -> Result<(Outcome, u64), ConnectionError> {
        let msg = Message {
            from: request.from.unwrap_or(Address::ZERO),
            to: request.to,
            value: request.value_or_zero(),
            data: request.data.clone().unwrap_or_default(),
        };
        let mut working = self.inner.state.read().clone();
        let outcome = self.run(&mut working, &msg, is_static)?;
        let gas = self.gas_for(&msg, &outcome);
        Ok((outcome, gas))
    }

    fn fill_transaction(&self, request: &TransactionRequest, from: Address) -> Result<LegacyTransaction, ConnectionError> {
        let nonce = match request.nonce {
            Some(nonce) => nonce,
            None => self.inner.state.read().nonce(from),
        };
        let gas_limit = match request.gas {
            Some(gas) => gas,
            None => self.simulate(request, false)?.1,
        };
        Ok(LegacyTransaction {
            nonce,
            gas_price: request.gas_price.unwrap_or(self.inner.config.gas_price),
            gas_limit,
            to: request.to,
            value: request.value_or_zero(),
            data: request.data.clone().unwrap_or_default(),
        })
    }
}

fn transfer(state: &mut State, from: Address, to: Address, value: U256) {
    if value.is_zero() {
        return;
    }
    let sender = state.account_mut(from);
    sender.balance = sender.balance.saturating_sub(value);
    let recipient = state.account_mut(to);
    recipient.balance = recipient.balance.saturating_add(value);
}

fn revert_error(revert: crate::ports::runtime::Revert) -> ConnectionError {
    ConnectionError::Execution {
        message: revert.to_string(),
        data: Some(revert.data),
    }
}

/// Places a receipt in block `number`.
fn seal(mut receipt: TransactionReceipt, number: u64) -> TransactionReceipt {
    let mut preimage = number.to_be_bytes().to_vec();
    preimage.extend_from_slice(receipt.transaction_hash.as_bytes());
    let block_hash = keccak256(&preimage);
    receipt.block_number = number;
    receipt.block_hash = Some(block_hash);
    let tx_hash = receipt.transaction_hash;
    for (index, log) in receipt.logs.iter_mut().enumerate() {
        log.block_number = Some(number);
        log.transaction_hash = Some(tx_hash);
        log.log_index = Some(index as u64);
    }
    receipt
}

/// Hash of a node-signed transaction: there is no signature to hash, so
/// the unsigned payload is bound to the sender.
fn unsigned_hash(tx: &LegacyTransaction, from: Address, chain_id: u64) -> Hash {
    let mut stream = RlpStream::new_list(2);
    stream.append(&tx.signing_hash(chain_id).as_bytes().to_vec());
    stream.append(&from.as_bytes().to_vec());
    keccak256(&stream.out())
}

#[async_trait]
impl LedgerConnection for InMemoryLedger {
    fn endpoint(&self) -> String {
        "in-process".to_string()
    }

    async fn chain_id(&self) -> Result<u64, ConnectionError> {
        Ok(self.inner.config.chain_id)
    }

    async fn block_number(&self) -> Result<u64, ConnectionError> {
        Ok(self.head())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ConnectionError> {
        Ok(self.inner.dev_accounts.clone())
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ConnectionError> {
        Ok(self.inner.state.read().balance(address))
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ConnectionError> {
        Ok(self.inner.state.read().nonce(address))
    }

    async fn gas_price(&self) -> Result<U256, ConnectionError> {
        Ok(self.inner.config.gas_price)
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ConnectionError> {
        Ok(self.simulate(request, false)?.1)
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ConnectionError> {
        Ok(self.simulate(request, true)?.0.output.return_data)
    }

    #[instrument(skip(self, request), fields(from = ?request.from))]
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Hash, ConnectionError> {
        let from = request.from.ok_or_else(|| {
            ConnectionError::InvalidTransaction("missing `from` for node-signed transaction".into())
        })?;
        if !self.inner.dev_accounts.contains(&from) {
            return Err(ConnectionError::UnknownSigner(from));
        }
        let tx = self.fill_transaction(request, from)?;
        let tx_hash = unsigned_hash(&tx, from, self.inner.config.chain_id);
        self.apply(&tx, from, tx_hash)
    }

    #[instrument(skip_all)]
    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<Hash, ConnectionError> {
        let signed = SignedLegacyTransaction::decode(raw.as_slice())?;
        if signed.chain_id() != Some(self.inner.config.chain_id) {
            return Err(ConnectionError::InvalidTransaction(format!(
                "chain id mismatch: expected {}, got {:?}",
                self.inner.config.chain_id,
                signed.chain_id()
            )));
        }
        let from = signed.recover_sender()?;
        self.apply(&signed.transaction, from, signed.hash)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ConnectionError> {
        Ok(self.inner.receipts.read().get(&tx_hash).cloned())
    }
}
