//! # BN254 Scalar Conversion
//!
//! Bridges the arbitrary-precision integers used at the API surface and the
//! `Fr` scalars used by the hash and the circuit.
//!
//! Two conversions exist on purpose:
//!
//! - [`to_field_reduced()`] reduces modulo `p`. Commitments use it, matching
//!   circomlib, which reduces hash inputs silently.
//! - [`to_field()`] rejects values `>= p`. Circuit inputs use it: a witness
//!   that only matches after reduction is not the value the user committed
//!   to, and proving it would attest to something else.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use zkq_core::EncodingError;

use crate::error::CryptoError;

/// The BN254 scalar field modulus `p`.
pub fn scalar_modulus() -> BigUint {
    BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
}

/// Convert a canonical value (`value < p`) into a scalar.
pub fn to_field(value: &BigUint) -> Result<Fr, CryptoError> {
    if *value >= scalar_modulus() {
        return Err(CryptoError::OutOfField(EncodingError::ExceedsField {
            bits: value.bits(),
            modulus_bits: Fr::MODULUS_BIT_SIZE,
        }));
    }
    Ok(to_field_reduced(value))
}

/// Convert any value into a scalar by reducing modulo `p`.
pub fn to_field_reduced(value: &BigUint) -> Fr {
    Fr::from_be_bytes_mod_order(&value.to_bytes_be())
}

/// The canonical integer representative of a scalar.
pub fn from_field(scalar: &Fr) -> BigUint {
    BigUint::from_bytes_be(&scalar.into_bigint().to_bytes_be())
}
