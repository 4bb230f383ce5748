//! # Hex Quantities
//!
//! Serde helpers for JSON-RPC quantities (`"0x1a"`). Decimal JSON numbers
//! are accepted on input since some nodes emit them for small values.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

use crate::errors::HexError;

/// Formats a `u64` as a JSON-RPC quantity.
#[must_use]
pub fn to_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// Parses a JSON-RPC quantity into a `u64`.
pub fn parse_quantity(input: &str) -> Result<u64, HexError> {
    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| HexError::Quantity(input.to_string()))?;
    if digits.is_empty() {
        return Err(HexError::Quantity(input.to_string()));
    }
    u64::from_str_radix(digits, 16).map_err(|_| HexError::Quantity(input.to_string()))
}

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 0x-prefixed hex quantity")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        parse_quantity(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }
}

/// `#[serde(with = "quantity")]` for `u64` fields.
pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_quantity(*value))
}

/// `#[serde(with = "quantity")]` for `u64` fields.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    deserializer.deserialize_any(QuantityVisitor)
}

/// `#[serde(with = "quantity::option")]` for `Option<u64>` fields.
pub mod option {
    use super::{to_quantity, QuantityVisitor};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "inner")] u64);

    fn inner<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&to_quantity(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
    }
}
