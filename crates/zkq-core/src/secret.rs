//! # Secrets and Commitments
//!
//! A [`Secret`] is the integer form of a user's free-text answer. A
//! [`Commitment`] is its public one-way image, used on-chain as the
//! identifier of the question the answer belongs to.
//!
//! ## Encoding
//!
//! [`encode()`] reads the UTF-8 bytes of the text as a big-endian base-256
//! integer: for each byte in order, `acc = acc * 256 + byte`. The empty
//! string encodes to zero. The circuit receives exactly this integer, so
//! the encoding must never change.
//!
//! ## Security Invariant
//!
//! `Secret` does not implement `Display` and its `Debug` output is
//! redacted. Revealing the value requires an explicit call to
//! [`Secret::expose_decimal`].

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::EncodingError;
use crate::numeric::parse_uint;

/// Longest answer text, in bytes, whose encoding is always below the BN254
/// scalar modulus (a 254-bit prime). Texts of up to 31 bytes encode to at
/// most 248 bits.
pub const MAX_FIELD_SAFE_BYTES: usize = 31;

/// Integer-encoded form of a user's answer. Never persisted by this crate.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret(BigUint);

impl Secret {
    /// Wrap an already-encoded integer.
    pub fn from_biguint(value: BigUint) -> Self {
        Self(value)
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Number of significant bits (zero for the empty answer).
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Number of bytes needed to hold the value (zero for the empty answer).
    ///
    /// Equals the UTF-8 length of the encoded text unless the text starts
    /// with NUL bytes.
    pub fn byte_len_hint(&self) -> usize {
        self.0.bits().div_ceil(8) as usize
    }

    /// Whether the value is representable in `bits` bits.
    pub fn fits_bits(&self, bits: u64) -> bool {
        self.0.bits() <= bits
    }

    /// Render the secret in decimal. Callers decide where this may go.
    pub fn expose_decimal(&self) -> String {
        self.0.to_str_radix(10)
    }
}

impl From<u64> for Secret {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED; {} bits])", self.0.bits())
    }
}

/// Encode answer text as a [`Secret`].
///
/// Total and pure: every string has exactly one encoding.
pub fn encode(text: &str) -> Secret {
    // `from_bytes_be` is the base-256 fold described in the module docs.
    Secret(BigUint::from_bytes_be(text.as_bytes()))
}

/// Strip surrounding whitespace from a raw answer before encoding.
///
/// Every entry point that accepts typed answers normalizes them this way,
/// so `"Paris "` and `"Paris"` commit to the same value.
pub fn normalize_answer(raw: &str) -> &str {
    raw.trim()
}

/// Public one-way image of a [`Secret`]. Serialized as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(#[serde(with = "crate::numeric::decimal")] BigUint);

impl Commitment {
    /// Wrap an integer commitment value.
    pub fn from_biguint(value: BigUint) -> Self {
        Self(value)
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consume and return the underlying integer.
    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

impl From<u64> for Commitment {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl FromStr for Commitment {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uint(s).map(Self)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Known vectors ───────────────────────────────────────────────

    #[test]
    fn encode_known_vector() {
        assert_eq!(encode("test123").expose_decimal(), "32762643843461683");
    }

    #[test]
    fn encode_empty_string_is_zero() {
        assert_eq!(encode(""), Secret::from(0));
        assert_eq!(encode("").bits(), 0);
    }

    #[test]
    fn encode_single_byte() {
        assert_eq!(encode("a"), Secret::from(97));
    }

    #[test]
    fn encode_uses_utf8_bytes() {
        // U+00E9 is 0xC3 0xA9 in UTF-8.
        assert_eq!(encode("é"), Secret::from(0xC3A9));
    }

    #[test]
    fn encode_distinguishes_close_strings() {
        assert_ne!(encode("abc"), encode("abd"));
    }

    #[test]
    fn max_field_safe_text_fits_248_bits() {
        let text = "\u{7f}".repeat(MAX_FIELD_SAFE_BYTES);
        assert!(encode(&text).fits_bits(248));
        assert_eq!(encode(&text).byte_len_hint(), MAX_FIELD_SAFE_BYTES);
    }

    #[test]
    fn byte_len_hint_matches_utf8_length() {
        assert_eq!(encode("").byte_len_hint(), 0);
        assert_eq!(encode("paris").byte_len_hint(), 5);
        assert_eq!(encode("é").byte_len_hint(), 2);
        assert!(!encode("paris").fits_bits(32));
    }

    // ── Normalization ───────────────────────────────────────────────

    #[test]
    fn normalize_trims_both_ends() {
        assert_eq!(normalize_answer("  Paris \n"), "Paris");
        assert_eq!(encode(normalize_answer(" a ")), encode("a"));
    }

    // ── Redaction and serialization ─────────────────────────────────

    #[test]
    fn secret_debug_is_redacted() {
        let rendered = format!("{:?}", encode("hunter2"));
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains(&encode("hunter2").expose_decimal()));
    }

    #[test]
    fn commitment_serializes_as_decimal_string() {
        let c: Commitment =
            "19052927052134838559015530275350142770733084377916632950657130648826802161200"
                .parse()
                .unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(
            json,
            "\"19052927052134838559015530275350142770733084377916632950657130648826802161200\""
        );
        let back: Commitment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn commitment_parses_hex() {
        let c: Commitment = "0x2a".parse().unwrap();
        assert_eq!(c, Commitment::from(42));
        assert_eq!(c.to_string(), "42");
    }

    #[test]
    fn commitment_rejects_garbage() {
        assert!("forty-two".parse::<Commitment>().is_err());
    }

    // ── Properties ──────────────────────────────────────────────────

    proptest! {
        #[test]
        fn encode_is_deterministic(s in ".*") {
            prop_assert_eq!(encode(&s), encode(&s));
        }

        #[test]
        fn encode_is_injective_without_leading_nul(
            a in "[a-zA-Z0-9 ?!]{1,31}",
            b in "[a-zA-Z0-9 ?!]{1,31}",
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(encode(&a), encode(&b));
        }

        #[test]
        fn encode_matches_base256_fold(s in "\\PC{0,24}") {
            let folded = s
                .as_bytes()
                .iter()
                .fold(BigUint::from(0u8), |acc, b| acc * 256u32 + *b);
            let encoded = encode(&s);
            prop_assert_eq!(encoded.as_biguint(), &folded);
        }
    }
}
