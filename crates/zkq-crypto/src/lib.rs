//! # zkq-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for answer-chain proofs:
//!
//! - **Poseidon commitments** over the BN254 scalar field, bit-compatible
//!   with circomlib's `poseidon([x])`, so commitments produced here match
//!   commitments produced by any circom-based front end and by the
//!   in-circuit gadget in `zkq-zkp`.
//! - **Field conversion** between [`num_bigint::BigUint`] values and
//!   [`ark_bn254::Fr`] scalars, with explicit range checks where a value
//!   must already be canonical.
//!
//! ## Crate Policy
//!
//! - Depends only on `zkq-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use the
//!   real permutation and real known vectors.
//! - `unsafe` prohibited.

pub mod error;
pub mod field;
pub mod poseidon;

pub use error::CryptoError;
pub use field::{from_field, scalar_modulus, to_field, to_field_reduced};
pub use light_poseidon::PoseidonParameters;
pub use poseidon::{check_answer, circom_parameters, commit, commit_field};
