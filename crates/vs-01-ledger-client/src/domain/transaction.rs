//! # Legacy Transactions
//!
//! EIP-155 replay-protected legacy transactions: the format every
//! Ethereum-compatible node accepts through `eth_sendRawTransaction`.
//!
//! ```text
//! signing payload = rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])
//! raw             = rlp([nonce, gasPrice, gas, to, value, data, v, r, s])
//! v               = recovery_id + chainId * 2 + 35
//! ```

use rlp::{Rlp, RlpStream};
use shared_types::{keccak256, Address, Bytes, Hash, U256};

use crate::domain::identity::{RecoverableSignature, Wallet};
use crate::errors::{ConnectionError, WalletError};

/// An unsigned legacy transaction with every field filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    /// `None` creates a contract.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
}

impl LegacyTransaction {
    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas_limit);
        match self.to {
            Some(to) => stream.append(&to.as_bytes().to_vec()),
            None => stream.append_empty_data(),
        };
        stream.append(&self.value);
        stream.append(&self.data.as_slice().to_vec());
    }

    /// EIP-155 signing hash for `chain_id`.
    #[must_use]
    pub fn signing_hash(&self, chain_id: u64) -> Hash {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&chain_id);
        stream.append_empty_data();
        stream.append_empty_data();
        keccak256(&stream.out())
    }

    /// RLP encoding of the signed transaction.
    #[must_use]
    pub fn encode_signed(&self, signature: &RecoverableSignature, chain_id: u64) -> Bytes {
        let v = u64::from(signature.recovery_id) + chain_id * 2 + 35;
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&v);
        stream.append(&U256::from_big_endian(&signature.r));
        stream.append(&U256::from_big_endian(&signature.s));
        Bytes(stream.out().to_vec())
    }

    /// Signs for `chain_id` and returns the raw transaction bytes.
    pub fn sign(&self, wallet: &Wallet, chain_id: u64) -> Result<Bytes, WalletError> {
        let signature = wallet.sign_hash(&self.signing_hash(chain_id))?;
        Ok(self.encode_signed(&signature, chain_id))
    }
}

/// A decoded raw legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLegacyTransaction {
    pub transaction: LegacyTransaction,
    pub v: u64,
    pub signature: RecoverableSignature,
    /// Keccak-256 of the raw encoding: the transaction hash.
    pub hash: Hash,
}

impl SignedLegacyTransaction {
    /// Decodes a raw legacy transaction.
    pub fn decode(raw: &[u8]) -> Result<Self, ConnectionError> {
        let rlp = Rlp::new(raw);
        if !rlp.is_list() {
            return Err(invalid("raw transaction is not an RLP list"));
        }
        let count = rlp.item_count().map_err(|e| invalid(e.to_string()))?;
        if count != 9 {
            return Err(invalid(format!("expected 9 fields, got {count}")));
        }

        let to_bytes: Vec<u8> = rlp.val_at(3).map_err(|e| invalid(e.to_string()))?;
        let to = if to_bytes.is_empty() {
            None
        } else {
            Some(Address::from_slice(&to_bytes).ok_or_else(|| invalid("bad `to` length"))?)
        };

        let v: u64 = rlp.val_at(6).map_err(|e| invalid(e.to_string()))?;
        let r: U256 = rlp.val_at(7).map_err(|e| invalid(e.to_string()))?;
        let s: U256 = rlp.val_at(8).map_err(|e| invalid(e.to_string()))?;
        let recovery_id = match v {
            27 | 28 => (v - 27) as u8,
            v if v >= 35 => ((v - 35) % 2) as u8,
            other => return Err(invalid(format!("invalid v value {other}"))),
        };
        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        r.to_big_endian(&mut r_bytes);
        s.to_big_endian(&mut s_bytes);

        let data: Vec<u8> = rlp.val_at(5).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            transaction: LegacyTransaction {
                nonce: rlp.val_at(0).map_err(|e| invalid(e.to_string()))?,
                gas_price: rlp.val_at(1).map_err(|e| invalid(e.to_string()))?,
                gas_limit: rlp.val_at(2).map_err(|e| invalid(e.to_string()))?,
                to,
                value: rlp.val_at(4).map_err(|e| invalid(e.to_string()))?,
                data: Bytes(data),
            },
            v,
            signature: RecoverableSignature {
                r: r_bytes,
                s: s_bytes,
                recovery_id,
            },
            hash: keccak256(raw),
        })
    }

    /// Chain id encoded in `v`, or `None` for pre-EIP-155 signatures.
    #[must_use]
    pub fn chain_id(&self) -> Option<u64> {
        if self.v >= 35 {
            Some((self.v - 35) / 2)
        } else {
            None
        }
    }

    /// Recovers the sender address.
    pub fn recover_sender(&self) -> Result<Address, ConnectionError> {
        let hash = match self.chain_id() {
            Some(chain_id) => self.transaction.signing_hash(chain_id),
            None => {
                let mut stream = RlpStream::new_list(6);
                self.transaction.append_body(&mut stream);
                keccak256(&stream.out())
            }
        };
        Ok(self.signature.recover(&hash)?)
    }
}

fn invalid(message: impl Into<String>) -> ConnectionError {
    ConnectionError::InvalidTransaction(message.into())
}
