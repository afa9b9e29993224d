//! # Answer Prover
//!
//! Produces verifier-ready proofs that a secret opens a question's
//! commitment, bound to the prover's identity.
//!
//! ## Flow
//!
//! 1. Embed secret, identity and commitment as scalars. Non-canonical
//!    values are rejected, never reduced.
//! 2. Load the circuit bundle through the shared [`ArtifactCache`].
//! 3. Acquire a proving permit, then synthesize, check and prove on a
//!    blocking thread.
//! 4. Format the raw output with [`format_proof`].
//!
//! Nothing here retries. A failed artifact fetch surfaces as
//! [`ProofError::CircuitLoad`] and the next call fetches again.
//!
//! ## Concurrency
//!
//! Proving is CPU-bound. A [`Semaphore`] caps the number of proofs in
//! flight across every task sharing the prover, so a burst of check-ins
//! cannot starve the async runtime's blocking pool.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use ark_bn254::{Bn254, Fr};
use ark_groth16::PreparedVerifyingKey;
use tokio::sync::Semaphore;
use zkq_core::{
    encode, normalize_answer, resolve_secret_text, AnswerBook, Commitment, PublicIdentity,
    QuestionGraph, Secret,
};
use zkq_crypto::to_field;

use crate::artifacts::{ArtifactCache, ArtifactError, LoadedCircuit};
use crate::config::ProverConfig;
use crate::format::{format_proof, Proof, RawProof};
use crate::groth16::Groth16ProofSystem;
use crate::traits::{ProofError, ProofSystem, WitnessFailure};
use crate::verifier::verify_prepared;

/// An answer waiting to be proved, as kept by a check-in queue.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingCheckin {
    /// The question's commitment.
    pub question: Commitment,
    /// Full secret text for the question (already composed for dependent
    /// questions).
    pub secret_text: String,
}

impl std::fmt::Debug for PendingCheckin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCheckin")
            .field("question", &self.question)
            .field("secret_text", &"[REDACTED]")
            .finish()
    }
}

/// Result of proving one pending check-in.
#[derive(Debug)]
pub struct CheckinOutcome {
    /// The question the proof was attempted for.
    pub question: Commitment,
    /// The proof, or why it could not be produced.
    pub result: Result<Proof, ProofError>,
}

/// Generates answer proofs for one circuit.
#[derive(Debug, Clone)]
pub struct AnswerProver {
    cache: Arc<ArtifactCache>,
    circuit: String,
    permits: Arc<Semaphore>,
}

impl AnswerProver {
    /// Prover for `circuit` loading through `cache`, computing at most
    /// `max_concurrent_proofs` proofs at once.
    pub fn new(
        cache: Arc<ArtifactCache>,
        circuit: impl Into<String>,
        max_concurrent_proofs: NonZeroUsize,
    ) -> Self {
        Self {
            cache,
            circuit: circuit.into(),
            permits: Arc::new(Semaphore::new(max_concurrent_proofs.get())),
        }
    }

    /// Prover with its own cache, built from configuration.
    pub fn from_config(config: &ProverConfig) -> Result<Self, ArtifactError> {
        let cache = Arc::new(ArtifactCache::new(config.artifact_source()?));
        Ok(Self::new(
            cache,
            config.circuit.clone(),
            config.max_concurrent_proofs,
        ))
    }

    /// Circuit name this prover uses.
    pub fn circuit(&self) -> &str {
        &self.circuit
    }

    /// The artifact cache shared by this prover.
    pub fn cache(&self) -> &Arc<ArtifactCache> {
        &self.cache
    }

    /// Load (or reuse) the circuit bundle.
    pub async fn load(&self) -> Result<Arc<LoadedCircuit>, ProofError> {
        Ok(self.cache.load(&self.circuit).await?)
    }

    /// Prove that `secret` opens `commitment`, bound to `identity`.
    ///
    /// # Errors
    ///
    /// [`ProofError::WitnessComputation`] with
    /// [`WitnessFailure::CommitmentMismatch`] when the secret is wrong;
    /// see [`ProofError::is_wrong_answer`].
    pub async fn generate_proof(
        &self,
        secret: &Secret,
        identity: &PublicIdentity,
        commitment: &Commitment,
    ) -> Result<Proof, ProofError> {
        let raw = self.generate_raw_proof(secret, identity, commitment).await?;
        format_proof(&raw)
    }

    /// Like [`generate_proof`](Self::generate_proof), returning the
    /// backend's raw output.
    pub async fn generate_raw_proof(
        &self,
        secret: &Secret,
        identity: &PublicIdentity,
        commitment: &Commitment,
    ) -> Result<RawProof, ProofError> {
        let secret = canonical(secret.as_biguint(), "secret")?;
        let identity = canonical(identity.as_biguint(), "identity")?;
        let expected = canonical(commitment.as_biguint(), "expected_commitment")?;

        let loaded = self.load().await?;
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ProofError::Proving(e.to_string()))?;

        let circuit_name = self.circuit.clone();
        let (result, elapsed) = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let started = Instant::now();
            let circuit = loaded.answer_circuit(secret, identity, expected);
            let result = Groth16ProofSystem
                .prove(loaded.proving_key(), &circuit)
                .and_then(|raw| ensure_verifies(loaded.prepared_verifying_key(), &raw).map(|()| raw));
            (result, started.elapsed())
        })
        .await
        .map_err(|e| ProofError::Proving(format!("proving task failed: {e}")))?;

        match &result {
            Ok(_) => tracing::info!(
                circuit = %circuit_name,
                elapsed_ms = elapsed.as_millis() as u64,
                "proof generated"
            ),
            Err(e) => tracing::debug!(
                circuit = %circuit_name,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "proof not generated"
            ),
        }
        result
    }

    /// Prove a typed answer to `question`, composing it with the parent's
    /// recorded secret text when the question has a dependency.
    pub async fn prove_answer(
        &self,
        graph: &QuestionGraph,
        book: &AnswerBook,
        question: &Commitment,
        answer: &str,
        identity: &PublicIdentity,
    ) -> Result<Proof, ProofError> {
        let text = resolve_secret_text(graph, book, question, normalize_answer(answer))?;
        self.generate_proof(&encode(&text), identity, question).await
    }

    /// Prove every pending check-in for `identity`.
    ///
    /// Each item gets its own outcome, in input order. A failing item is
    /// logged and does not stop the rest.
    pub async fn prove_pending(
        &self,
        identity: &PublicIdentity,
        pending: &[PendingCheckin],
    ) -> Vec<CheckinOutcome> {
        let mut outcomes = Vec::with_capacity(pending.len());
        for checkin in pending {
            let secret = encode(normalize_answer(&checkin.secret_text));
            let result = self
                .generate_proof(&secret, identity, &checkin.question)
                .await;
            if let Err(e) = &result {
                tracing::warn!(
                    question = %checkin.question,
                    wrong_answer = e.is_wrong_answer(),
                    error = %e,
                    "pending check-in could not be proved"
                );
            }
            outcomes.push(CheckinOutcome {
                question: checkin.question.clone(),
                result,
            });
        }

        let proved = outcomes.iter().filter(|o| o.result.is_ok()).count();
        tracing::info!(
            total = outcomes.len(),
            proved,
            failed = outcomes.len() - proved,
            "pending check-ins processed"
        );
        outcomes
    }
}

/// Reject a proof the published verification key would not accept.
fn ensure_verifies(prepared: &PreparedVerifyingKey<Bn254>, raw: &RawProof) -> Result<(), ProofError> {
    let proof = format_proof(raw)?;
    match verify_prepared(prepared, &proof, &proof.inputs) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ProofError::Proving(
            "generated proof is rejected by the verification key".into(),
        )),
        Err(e) => Err(ProofError::Proving(format!(
            "generated proof could not be checked: {e}"
        ))),
    }
}

fn canonical(value: &num_bigint::BigUint, input: &'static str) -> Result<Fr, ProofError> {
    to_field(value).map_err(|_| ProofError::WitnessComputation(WitnessFailure::NotCanonical { input }))
}
