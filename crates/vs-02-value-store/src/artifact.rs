//! # Contract Artifacts
//!
//! Compiled bytecode is an opaque input. Both common artifact layouts are
//! accepted; every other field is ignored:
//!
//! - Hardhat: `{"contractName": "...", "bytecode": "0x..."}`
//! - Foundry: `{"bytecode": {"object": "0x..."}}`

use std::path::Path;

use serde::Deserialize;
use shared_types::Bytes;

use crate::errors::ArtifactError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(Bytes),
    Object { object: Bytes },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    #[serde(default)]
    contract_name: Option<String>,
    #[serde(default)]
    bytecode: Option<BytecodeField>,
}

/// Deployable contract bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub contract_name: Option<String>,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    #[must_use]
    pub fn from_bytecode(bytecode: Bytes) -> Self {
        Self {
            contract_name: None,
            bytecode,
        }
    }

    /// Parses an artifact from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)?;
        let bytecode = match raw.bytecode {
            Some(BytecodeField::Hex(bytes) | BytecodeField::Object { object: bytes }) => bytes,
            None => return Err(ArtifactError::MissingBytecode),
        };
        if bytecode.is_empty() {
            return Err(ArtifactError::MissingBytecode);
        }
        Ok(Self {
            contract_name: raw.contract_name,
            bytecode,
        })
    }

    /// Reads and parses an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
