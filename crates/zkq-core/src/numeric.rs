//! # Unsigned Integer Literals
//!
//! Parsing and serde helpers for the arbitrary-precision integers that
//! cross the wire. Integers are always carried as strings: decimal on
//! output, decimal or `0x`-prefixed hex on input. JSON numbers would
//! silently lose precision above 2^53 in most consumers.

use num_bigint::BigUint;

use crate::error::EncodingError;

/// Parse a decimal or `0x`/`0X`-prefixed hexadecimal unsigned integer.
///
/// Surrounding whitespace is ignored. Signs, separators and empty input
/// are rejected.
pub fn parse_uint(input: &str) -> Result<BigUint, EncodingError> {
    let trimmed = input.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(EncodingError::InvalidInteger(input.to_string()));
    }

    BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| EncodingError::InvalidInteger(input.to_string()))
}

/// Serde adapter: `BigUint` as a decimal string.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_uint(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: `Vec<BigUint>` as a list of decimal strings.
pub mod decimal_vec {
    use num_bigint::BigUint;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_str_radix(10))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<BigUint>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| super::parse_uint(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Serde adapter: `[BigUint; 2]` as a pair of decimal strings.
pub mod decimal_pair {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(values: &[BigUint; 2], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::decimal_vec::serialize(values, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[BigUint; 2], D::Error>
    where
        D: Deserializer<'de>,
    {
        let [first, second] = <[String; 2]>::deserialize(deserializer)?;
        let parse = |s: &str| super::parse_uint(s).map_err(serde::de::Error::custom);
        Ok([parse(&first)?, parse(&second)?])
    }
}
