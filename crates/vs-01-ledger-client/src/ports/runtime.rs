//! # Native Program Runtime
//!
//! The in-process ledger does not interpret bytecode. Contracts are native
//! programs registered against an init-code prefix: a creation transaction
//! whose data starts with that prefix instantiates the program, and the rest
//! of the data is handed over as ABI-encoded constructor arguments.

use std::fmt;

use shared_types::{abi, Address, Bytes, Log, U256};

/// Execution context of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller (`msg.sender`).
    pub caller: Address,
    /// Address of the executing contract.
    pub contract: Address,
    /// Value transferred with the call (`msg.value`).
    pub value: U256,
    /// True for `eth_call`: nothing the call does is committed.
    pub is_static: bool,
}

/// Successful execution result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub return_data: Bytes,
    pub logs: Vec<Log>,
}

impl ExecutionOutput {
    #[must_use]
    pub fn returning(return_data: Vec<u8>) -> Self {
        Self {
            return_data: Bytes(return_data),
            logs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_log(mut self, log: Log) -> Self {
        self.logs.push(log);
        self
    }
}

/// A revert: all state changes of the call are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revert {
    pub data: Bytes,
}

impl Revert {
    /// Revert with an `Error(string)` payload.
    #[must_use]
    pub fn reason(reason: &str) -> Self {
        Self {
            data: abi::encode_revert_reason(reason),
        }
    }

    /// Revert with no data.
    #[must_use]
    pub fn empty() -> Self {
        Self { data: Bytes::new() }
    }

    /// Decoded `Error(string)` reason, if any.
    #[must_use]
    pub fn decoded_reason(&self) -> Option<String> {
        abi::decode_revert_reason(self.data.as_slice())
    }
}

impl fmt::Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decoded_reason() {
            Some(reason) => write!(f, "reverted with reason string '{reason}'"),
            None => f.write_str("reverted"),
        }
    }
}

/// A contract type that can be deployed on the in-process ledger.
pub trait NativeProgram: Send + Sync {
    /// Program name for logs.
    fn name(&self) -> &str;

    /// Runs the constructor. `constructor_args` are the bytes following the
    /// registered init-code prefix.
    fn instantiate(
        &self,
        ctx: &CallContext,
        constructor_args: &[u8],
    ) -> Result<Box<dyn ContractState>, Revert>;
}

/// Storage and behaviour of one deployed contract instance.
pub trait ContractState: Send + Sync + fmt::Debug {
    /// Executes `input` as calldata. Mutations on a revert are discarded by
    /// the ledger, which always executes against a copy.
    fn execute(&mut self, ctx: &CallContext, input: &[u8]) -> Result<ExecutionOutput, Revert>;

    /// Clones the instance for copy-on-write execution.
    fn clone_box(&self) -> Box<dyn ContractState>;
}

impl Clone for Box<dyn ContractState> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
