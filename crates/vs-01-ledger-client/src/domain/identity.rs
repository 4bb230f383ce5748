//! # Identities and Wallets
//!
//! An [`Identity`] is an address, optionally paired with secret material. With
//! a [`Wallet`] it signs its own transactions; without one the ledger node
//! must manage the account (or the identity is only a reference address).
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2)
//! - Secret bytes are zeroized after parsing and `Debug` never prints them

use std::fmt;
use std::sync::Arc;

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{decode_hex, keccak256, Address, Hash};
use zeroize::Zeroize;

use crate::errors::WalletError;

// =============================================================================
// SIGNATURE
// =============================================================================

/// A recoverable secp256k1 signature in `(r, s, recovery_id)` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// 0 or 1, parity of the ephemeral point's y coordinate.
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// Recovers the signer address of `message_hash`.
    pub fn recover(&self, message_hash: &Hash) -> Result<Address, WalletError> {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        let signature = Signature::from_slice(&bytes).map_err(|_| WalletError::Recovery)?;
        let recovery_id = RecoveryId::from_byte(self.recovery_id).ok_or(WalletError::Recovery)?;
        let key = VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &signature, recovery_id)
            .map_err(|_| WalletError::Recovery)?;
        Ok(address_from_verifying_key(&key))
    }
}

/// Derives the account address of a public key: the last 20 bytes of the
/// Keccak-256 of the uncompressed point without its `0x04` prefix.
#[must_use]
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash.0[12..]);
    Address(address)
}

// =============================================================================
// WALLET
// =============================================================================

/// A secp256k1 key pair able to sign transactions for its address.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Builds a wallet from a 32-byte secret in hex, with or without `0x`.
    pub fn from_secret_hex(secret: &str) -> Result<Self, WalletError> {
        let mut bytes = decode_hex(secret).map_err(|e| WalletError::InvalidSecret(e.to_string()))?;
        if bytes.len() != 32 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(WalletError::InvalidSecret(format!(
                "expected 32 bytes, got {len}"
            )));
        }
        let mut secret_bytes = [0u8; 32];
        secret_bytes.copy_from_slice(&bytes);
        bytes.zeroize();
        let wallet = Self::from_secret_bytes(secret_bytes);
        secret_bytes.zeroize();
        wallet
    }

    /// Builds a wallet from raw secret bytes.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Result<Self, WalletError> {
        let signing_key = SigningKey::from_bytes((&bytes).into())
            .map_err(|_| WalletError::InvalidSecret("not a valid secp256k1 scalar".into()))?;
        let address = address_from_verifying_key(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// The wallet's account address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Signs a 32-byte message hash, normalizing S to the lower half order.
    pub fn sign_hash(&self, message_hash: &Hash) -> Result<RecoverableSignature, WalletError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(message_hash.as_bytes())
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        let (signature, recovery_id) = match signature.normalize_s() {
            Some(normalized) => (
                normalized,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (signature, recovery_id),
        };

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(RecoverableSignature {
            r,
            s,
            recovery_id: recovery_id.to_byte(),
        })
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// An address that can be referenced, optionally able to sign.
#[derive(Clone)]
pub struct Identity {
    address: Address,
    wallet: Option<Arc<Wallet>>,
}

impl Identity {
    /// An account whose transactions the ledger node signs (or a bare
    /// reference address).
    #[must_use]
    pub fn node_managed(address: Address) -> Self {
        Self {
            address,
            wallet: None,
        }
    }

    /// An account that signs locally with `wallet`.
    #[must_use]
    pub fn from_wallet(wallet: Wallet) -> Self {
        Self {
            address: wallet.address(),
            wallet: Some(Arc::new(wallet)),
        }
    }

    /// The identity's address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The local signer, if this identity carries secret material.
    #[must_use]
    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_deref()
    }

    /// Returns true if this identity carries secret material.
    #[must_use]
    pub fn has_secret(&self) -> bool {
        self.wallet.is_some()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Identity {}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.has_secret() { "signer" } else { "node-managed" };
        write!(f, "Identity({}, {kind})", self.address)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.address, f)
    }
}
