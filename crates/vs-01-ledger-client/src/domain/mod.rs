//! Domain layer: identities, wallets, transactions and pure ledger rules.

pub mod identity;
pub mod services;
pub mod transaction;

pub use identity::{address_from_verifying_key, Identity, RecoverableSignature, Wallet};
pub use services::{compute_contract_address, intrinsic_gas, max_cost};
pub use transaction::{LegacyTransaction, SignedLegacyTransaction};
