//! # Domain Services
//!
//! Pure functions shared by the ledger adapters.

use rlp::RlpStream;
use shared_types::{keccak256, Address, U256};

// =============================================================================
// CONTRACT ADDRESS
// =============================================================================

/// Address of a contract created by `sender` at `nonce`:
/// `keccak256(rlp([sender, nonce]))[12..]`.
#[must_use]
pub fn compute_contract_address(sender: Address, nonce: u64) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(&sender.as_bytes().to_vec());
    stream.append(&nonce);
    let hash = keccak256(&stream.out());
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash.0[12..]);
    Address::new(address)
}

// =============================================================================
// GAS
// =============================================================================

/// Base cost of a message call.
pub const TX_BASE_GAS: u64 = 21_000;

/// Base cost of a contract creation.
pub const CREATE_BASE_GAS: u64 = 53_000;

/// Intrinsic gas: base cost plus 16 per non-zero and 4 per zero data byte.
#[must_use]
pub fn intrinsic_gas(data: &[u8], is_contract_creation: bool) -> u64 {
    let base = if is_contract_creation {
        CREATE_BASE_GAS
    } else {
        TX_BASE_GAS
    };
    let data_gas: u64 = data
        .iter()
        .map(|&byte| if byte == 0 { 4u64 } else { 16u64 })
        .sum();
    base + data_gas
}

/// Upper bound a sender must hold: `value + gas_limit * gas_price`.
#[must_use]
pub fn max_cost(value: U256, gas_limit: u64, gas_price: U256) -> U256 {
    value.saturating_add(gas_price.saturating_mul(U256::from(gas_limit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_address_known_vector() {
        // First deployment from the default development account.
        let sender: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
        let expected: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        assert_eq!(compute_contract_address(sender, 0), expected);
    }

    #[test]
    fn test_contract_address_changes_with_nonce() {
        let sender = Address::new([9; 20]);
        assert_ne!(
            compute_contract_address(sender, 0),
            compute_contract_address(sender, 1)
        );
    }

    #[test]
    fn test_intrinsic_gas() {
        assert_eq!(intrinsic_gas(&[], false), 21_000);
        assert_eq!(intrinsic_gas(&[0, 1], false), 21_000 + 4 + 16);
        assert_eq!(intrinsic_gas(&[0xff], true), 53_016);
    }

    #[test]
    fn test_max_cost() {
        assert_eq!(
            max_cost(U256::from(5), 21_000, U256::from(2)),
            U256::from(42_005)
        );
    }
}
