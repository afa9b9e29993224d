//! Error types for commitment computation and field conversion.

use thiserror::Error;
use zkq_core::EncodingError;

/// Error raised by the cryptographic primitives.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The Poseidon backend could not be constructed or rejected its input.
    #[error("poseidon backend initialization failed: {0}")]
    BackendInit(String),

    /// A value that must already be a canonical scalar is not below the
    /// field modulus.
    #[error("value is not a canonical BN254 scalar: {0}")]
    OutOfField(#[from] EncodingError),
}
