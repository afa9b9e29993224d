//! # zkq-zkp — Answer Proofs
//!
//! Proves that a player knows the answer behind a published question
//! commitment without revealing it, in a form an on-chain Groth16 verifier
//! accepts.
//!
//! ## Architecture
//!
//! The [`ProofSystem`] trait defines the interface for proof backends and
//! is sealed. [`Groth16ProofSystem`] is the only backend: Groth16 over
//! BN254, proving the [`AnswerCircuit`](circuits::AnswerCircuit), which
//! evaluates the same Poseidon commitment as `zkq-crypto` in-circuit.
//!
//! - [`artifacts`]: fetches circuit manifests and keys from a directory or
//!   HTTP store and caches the decoded bundle per circuit name.
//! - [`AnswerProver`]: witness check, bounded proving, formatting, plus
//!   dependency-chain and batch check-in entry points.
//! - [`format`]: raw prover output and the verifier-facing [`Proof`].
//! - [`AnswerVerifier`]: off-chain verification of a formatted proof.
//!
//! ## Public Inputs
//!
//! Every proof carries `[identity, expected_commitment, computed_commitment]`.
//! The third entry always equals the second and identifies the question.
//!
//! ## Crate Policy
//!
//! - Key generation is never performed here. Keys come from the artifact
//!   store; tests generate throwaway keys in the test harness.
//! - No retries. Callers decide whether to try again.

pub mod artifacts;
pub mod circuits;
pub mod config;
pub mod format;
pub mod groth16;
pub mod prover;
pub mod traits;
pub mod verifier;

// Re-export primary types.
pub use artifacts::{
    ArtifactCache, ArtifactError, ArtifactKind, ArtifactSource, CircuitManifest, DirectorySource,
    HttpSource, LoadedCircuit,
};
pub use config::{ArtifactStore, ConfigError, ProverConfig};
pub use format::{format_proof, Proof, RawProof};
pub use groth16::Groth16ProofSystem;
pub use prover::{AnswerProver, CheckinOutcome, PendingCheckin};
pub use traits::{ProofError, ProofSystem, VerifyError, WitnessFailure};
pub use verifier::AnswerVerifier;
