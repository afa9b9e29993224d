//! # Answer Verifier Circuit
//!
//! Proves knowledge of a secret whose Poseidon commitment equals a public
//! commitment, bound to a public identity.
//!
//! Public inputs, in allocation order:
//! 1. `identity`: the prover's identity (account address as an integer).
//! 2. `expected_commitment`: the question's published commitment.
//! 3. `commitment_out`: the hash computed in-circuit, constrained equal to
//!    the expected commitment. On-chain verifiers read it as the question
//!    identifier.
//!
//! Witness (private):
//! - `secret`: the encoded answer. Never leaves the prover.
//!
//! Approximate constraint count: 215 (one Poseidon permutation plus one
//! identity binding constraint).

use std::fmt;
use std::sync::Arc;

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use zkq_crypto::PoseidonParameters;

use super::poseidon::PoseidonGadget;

/// Number of public inputs the circuit allocates.
pub const ANSWER_PUBLIC_INPUTS: usize = 3;

/// Circuit family name recorded in circuit manifests.
pub const ANSWER_CIRCUIT_KIND: &str = "answer-verifier";

/// Circuit proving `poseidon(secret) == expected_commitment`.
///
/// Assignments are `None` when the circuit is only used for its shape
/// (key generation).
#[derive(Clone)]
pub struct AnswerCircuit {
    params: Arc<PoseidonParameters<Fr>>,

    // -- Public inputs --
    identity: Option<Fr>,
    expected_commitment: Option<Fr>,

    // -- Witness (private inputs) --
    secret: Option<Fr>,
}

impl AnswerCircuit {
    /// Circuit with a full assignment, ready for witness computation.
    pub fn new(
        params: Arc<PoseidonParameters<Fr>>,
        secret: Fr,
        identity: Fr,
        expected_commitment: Fr,
    ) -> Self {
        Self {
            params,
            identity: Some(identity),
            expected_commitment: Some(expected_commitment),
            secret: Some(secret),
        }
    }

    /// Circuit without assignments, describing only the constraint shape.
    pub fn blank(params: Arc<PoseidonParameters<Fr>>) -> Self {
        Self {
            params,
            identity: None,
            expected_commitment: None,
            secret: None,
        }
    }
}

impl fmt::Debug for AnswerCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerCircuit")
            .field("identity", &self.identity)
            .field("expected_commitment", &self.expected_commitment)
            .field("secret", &self.secret.map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ConstraintSynthesizer<Fr> for AnswerCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let identity = FpVar::new_input(cs.clone(), || {
            self.identity.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let expected = FpVar::new_input(cs.clone(), || {
            self.expected_commitment
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let secret = FpVar::new_witness(cs.clone(), || {
            self.secret.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let computed = PoseidonGadget::new(self.params).hash(&secret)?;
        computed.enforce_equal(&expected)?;

        let commitment_out = FpVar::new_input(cs, || computed.value())?;
        commitment_out.enforce_equal(&computed)?;

        // Unused public inputs are malleable in Groth16; squaring ties the
        // identity to the proof.
        let _identity_sq = identity.square()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;
    use zkq_crypto::{circom_parameters, commit_field};

    fn params() -> Arc<PoseidonParameters<Fr>> {
        Arc::new(circom_parameters().unwrap())
    }

    fn synthesize(circuit: AnswerCircuit) -> ConstraintSystemRef<Fr> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs
    }

    // ── Satisfiability ──────────────────────────────────────────────

    #[test]
    fn correct_secret_satisfies_circuit() {
        let secret = Fr::from(1234u64);
        let h = commit_field(secret).unwrap();
        let cs = synthesize(AnswerCircuit::new(params(), secret, Fr::from(42u64), h));
        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_instance_variables(), ANSWER_PUBLIC_INPUTS + 1);
    }

    #[test]
    fn wrong_secret_is_unsatisfied() {
        let h = commit_field(Fr::from(1234u64)).unwrap();
        let cs = synthesize(AnswerCircuit::new(
            params(),
            Fr::from(1235u64),
            Fr::from(42u64),
            h,
        ));
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn public_inputs_are_identity_commitment_output() {
        let secret = Fr::from(99u64);
        let h = commit_field(secret).unwrap();
        let cs = synthesize(AnswerCircuit::new(params(), secret, Fr::from(7u64), h));
        let instance = cs.borrow().unwrap().instance_assignment.clone();
        assert_eq!(instance, vec![Fr::from(1u64), Fr::from(7u64), h, h]);
    }

    // ── Shape ───────────────────────────────────────────────────────

    #[test]
    fn blank_circuit_synthesizes_in_setup_mode() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(ark_relations::r1cs::SynthesisMode::Setup);
        AnswerCircuit::blank(params())
            .generate_constraints(cs.clone())
            .unwrap();
        assert_eq!(cs.num_instance_variables(), ANSWER_PUBLIC_INPUTS + 1);
        assert!(cs.num_constraints() > 0);
    }

    #[test]
    fn debug_redacts_secret() {
        let circuit = AnswerCircuit::new(params(), Fr::from(5u64), Fr::from(1u64), Fr::from(2u64));
        let rendered = format!("{circuit:?}");
        assert!(rendered.contains("[REDACTED]"));
    }
}
