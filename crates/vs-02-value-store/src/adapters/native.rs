//! # Native Value Store Program
//!
//! The value store as a [`NativeProgram`] for the in-process ledger. It
//! behaves like the compiled contract at the ABI boundary: same selectors,
//! same return encoding, same `NameSet` log and `Error("NotOwner")` revert.

use std::sync::Arc;

use shared_types::{abi, Bytes};
use tracing::trace;
use vs_01_ledger_client::ports::runtime::{
    CallContext, ContractState, ExecutionOutput, NativeProgram, Revert,
};
use vs_01_ledger_client::InMemoryLedger;

use crate::domain::codec::StoreCall;
use crate::domain::entities::ValueStore;
use crate::errors::{StoreError, NOT_OWNER_REASON};

/// Init code the in-process ledger maps to [`ValueStoreProgram`] when no
/// compiled artifact is supplied.
pub const NATIVE_INIT_CODE: &[u8] = b"\xfe\xedvalue-store/native";

/// Deploys [`ValueStoreInstanceState`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueStoreProgram;

impl ValueStoreProgram {
    /// Registers the program on `ledger` under `init_code`.
    pub fn register(ledger: &InMemoryLedger, init_code: Bytes) {
        ledger.register_program(init_code, Arc::new(Self));
    }
}

impl NativeProgram for ValueStoreProgram {
    fn name(&self) -> &str {
        "ValueStore"
    }

    fn instantiate(
        &self,
        ctx: &CallContext,
        constructor_args: &[u8],
    ) -> Result<Box<dyn ContractState>, Revert> {
        let name = abi::decode_string(constructor_args).map_err(|_| Revert::empty())?;
        Ok(Box::new(ValueStoreInstanceState {
            store: ValueStore::new(ctx.caller, name),
        }))
    }
}

/// One deployed store.
#[derive(Debug, Clone)]
pub struct ValueStoreInstanceState {
    store: ValueStore,
}

impl ContractState for ValueStoreInstanceState {
    fn execute(&mut self, ctx: &CallContext, input: &[u8]) -> Result<ExecutionOutput, Revert> {
        let call = StoreCall::decode(input)
            .map_err(|_| Revert::empty())?
            .ok_or_else(Revert::empty)?;
        trace!(?call, caller = %ctx.caller, "value store call");

        // Only the constructor is payable.
        if !ctx.value.is_zero() {
            return Err(Revert::empty());
        }

        match call {
            StoreCall::GetName => Ok(ExecutionOutput::returning(abi::encode_string(
                self.store.name(),
            ))),
            StoreCall::Owner => Ok(ExecutionOutput::returning(abi::encode_address(
                self.store.owner(),
            ))),
            StoreCall::ChangeName(new_name) => match self.store.change_name(ctx.caller, new_name) {
                Ok(event) => Ok(ExecutionOutput::default().with_log(event.to_log(ctx.contract))),
                Err(StoreError::NotOwner { .. }) => Err(Revert::reason(NOT_OWNER_REASON)),
                Err(_) => Err(Revert::empty()),
            },
        }
    }

    fn clone_box(&self) -> Box<dyn ContractState> {
        Box::new(self.clone())
    }
}
