//! # Proof System Trait (Sealed)
//!
//! The core abstraction for zero-knowledge proof backends, and the error
//! taxonomy shared by proving and verification.
//!
//! ## Sealed Trait
//!
//! The `ProofSystem` trait is **sealed**: only implementations defined within
//! the `zkq-zkp` crate can exist. External crates cannot implement it, so a
//! proof handed to an on-chain verifier always comes from a backend whose
//! witness checks live in this crate.
//!
//! ## Error Categories
//!
//! Callers must be able to tell "your answer is wrong" apart from "the
//! system failed". [`ProofError::is_wrong_answer`] is the single place that
//! decides which is which.

use num_bigint::BigUint;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use zkq_core::ChainError;
use zkq_crypto::CryptoError;

use crate::artifacts::ArtifactError;

/// Why no satisfying assignment exists for the supplied inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessFailure {
    /// The secret does not hash to the expected commitment.
    #[error("the secret does not match the expected commitment")]
    CommitmentMismatch,

    /// An input is not a canonical field element.
    #[error("{input} is not a canonical field element")]
    NotCanonical {
        /// Which input was rejected.
        input: &'static str,
    },

    /// Constraint synthesis itself failed.
    #[error("constraint synthesis failed: {0}")]
    Synthesis(String),
}

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The circuit or its keys could not be loaded.
    #[error("circuit load failed: {0}")]
    CircuitLoad(#[from] ArtifactError),

    /// The inputs do not satisfy the circuit.
    #[error("witness computation failed: {0}")]
    WitnessComputation(WitnessFailure),

    /// The proving backend failed internally.
    #[error("proof generation failed: {0}")]
    Proving(String),

    /// The backend's raw output does not have the expected shape.
    #[error("malformed raw proof: {0}")]
    MalformedRawProof(String),

    /// The commitment primitive could not be evaluated.
    #[error("commitment computation failed: {0}")]
    Commitment(#[from] CryptoError),

    /// The dependent secret could not be derived.
    #[error("dependency chain error: {0}")]
    Chain(#[from] ChainError),
}

impl ProofError {
    /// Whether the failure means the supplied answer is incorrect, as
    /// opposed to a system or integration fault.
    pub fn is_wrong_answer(&self) -> bool {
        matches!(
            self,
            ProofError::WitnessComputation(WitnessFailure::CommitmentMismatch)
        )
    }
}

/// Error during proof verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof is structurally malformed (bad coordinates, wrong input
    /// count, point not on the curve).
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The verification key could not be decoded.
    #[error("malformed verification key: {0}")]
    MalformedKey(String),

    /// The pairing check could not be evaluated.
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),
}

/// Private module that seals the [`ProofSystem`] trait.
mod private {
    /// Sealing marker trait. Not accessible outside `zkq-zkp`.
    pub trait Sealed {}
}

/// Sealed trait defining the interface for a zero-knowledge proof system.
///
/// Each implementation provides its own proof, key, and circuit types via
/// associated types. The trait requires `Send + Sync` so one instance can
/// serve concurrent proof requests.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// The proof type produced by this system.
    type Proof: Serialize + DeserializeOwned + Clone + std::fmt::Debug;
    /// The verifying key type.
    type VerifyingKey: Clone;
    /// The proving key type.
    type ProvingKey;
    /// The circuit type that defines the proof statement.
    type Circuit: Clone;

    /// Generate a proof that the prover knows a valid witness satisfying
    /// the circuit constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::WitnessComputation`] if the assignment does not
    /// satisfy the circuit. Returns [`ProofError::Proving`] if the backend
    /// fails.
    fn prove(
        &self,
        pk: &Self::ProvingKey,
        circuit: &Self::Circuit,
    ) -> Result<Self::Proof, ProofError>;

    /// Verify a proof against public inputs.
    ///
    /// Returns `Ok(false)` if the proof is cryptographically invalid but
    /// structurally well-formed.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[BigUint],
    ) -> Result<bool, VerifyError>;
}

impl private::Sealed for crate::groth16::Groth16ProofSystem {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_commitment_mismatch_is_a_wrong_answer() {
        assert!(ProofError::WitnessComputation(WitnessFailure::CommitmentMismatch).is_wrong_answer());
        assert!(!ProofError::WitnessComputation(WitnessFailure::NotCanonical { input: "secret" })
            .is_wrong_answer());
        assert!(!ProofError::Proving("backend".into()).is_wrong_answer());
        assert!(!ProofError::MalformedRawProof("a".into()).is_wrong_answer());
    }

    #[test]
    fn chain_errors_convert() {
        let err: ProofError = ChainError::MissingDependencyAnswer { dependency: None }.into();
        assert!(matches!(err, ProofError::Chain(_)));
        assert!(err.to_string().contains("dependency answer is missing"));
    }
}
