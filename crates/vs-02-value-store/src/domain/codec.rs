//! Contract interface of the value store.
//!
//! ```solidity
//! constructor(string name) payable
//! function getName() view returns (string)
//! function owner() view returns (address)
//! function changeName(string newName)
//! event NameSet(string name)
//! ```

use shared_types::{abi, AbiError, Address, Bytes};

pub const GET_NAME: &str = "getName()";
pub const OWNER: &str = "owner()";
pub const CHANGE_NAME: &str = "changeName(string)";
pub const NAME_SET_EVENT: &str = "NameSet(string)";

/// A decoded call into the value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetName,
    Owner,
    ChangeName(String),
}

impl StoreCall {
    /// Calldata for this call.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        match self {
            Self::GetName => abi::encode_call(GET_NAME, &[]),
            Self::Owner => abi::encode_call(OWNER, &[]),
            Self::ChangeName(name) => abi::encode_call(CHANGE_NAME, &abi::encode_string(name)),
        }
    }

    /// Decodes calldata; `Ok(None)` for an unknown selector.
    pub fn decode(input: &[u8]) -> Result<Option<Self>, AbiError> {
        let Some((selector, args)) = input.split_first_chunk::<4>() else {
            return Ok(None);
        };
        let call = if *selector == abi::selector(GET_NAME) {
            Self::GetName
        } else if *selector == abi::selector(OWNER) {
            Self::Owner
        } else if *selector == abi::selector(CHANGE_NAME) {
            Self::ChangeName(abi::decode_string(args)?)
        } else {
            return Ok(None);
        };
        Ok(Some(call))
    }

    /// Returns true if the call mutates state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::ChangeName(_))
    }
}

/// Creation payload: bytecode followed by the encoded constructor argument.
#[must_use]
pub fn deployment_payload(bytecode: &[u8], initial_name: &str) -> Bytes {
    let mut data = bytecode.to_vec();
    data.extend_from_slice(&abi::encode_string(initial_name));
    Bytes(data)
}

pub fn decode_name(return_data: &[u8]) -> Result<String, AbiError> {
    abi::decode_string(return_data)
}

pub fn decode_owner(return_data: &[u8]) -> Result<Address, AbiError> {
    abi::decode_address(return_data)
}
