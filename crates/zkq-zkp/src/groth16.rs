//! # Groth16 Proof System
//!
//! Groth16 over BN254 via arkworks, implementing the sealed
//! [`ProofSystem`] trait for the [`AnswerCircuit`].
//!
//! ## Properties
//!
//! - **Proof size:** 3 group elements (2 G1, 1 G2), independent of circuit size.
//! - **Verification time:** Constant (3 pairings).
//! - **Trusted setup:** Circuit-specific. Keys are published as artifacts.
//!
//! ## Witness Check
//!
//! Proving always synthesizes the circuit once and checks satisfiability
//! before any group operation. An answer that does not open the commitment
//! is reported as [`WitnessFailure::CommitmentMismatch`] and never reaches
//! the prover.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, SynthesisError};
use ark_snark::SNARK;
use num_bigint::BigUint;
use rand_core::OsRng;

use crate::circuits::AnswerCircuit;
use crate::format::{format_proof, RawProof};
use crate::traits::{ProofError, ProofSystem, VerifyError, WitnessFailure};

/// Groth16 proof system on BN254.
#[derive(Debug, Default, Clone, Copy)]
pub struct Groth16ProofSystem;

impl Groth16ProofSystem {
    /// Synthesize `circuit` and return its public inputs, in allocation
    /// order, if the assignment satisfies every constraint.
    pub fn compute_witness(&self, circuit: &AnswerCircuit) -> Result<Vec<Fr>, ProofError> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit
            .clone()
            .generate_constraints(cs.clone())
            .map_err(synthesis_failure)?;

        if !cs.is_satisfied().map_err(synthesis_failure)? {
            return Err(ProofError::WitnessComputation(
                WitnessFailure::CommitmentMismatch,
            ));
        }

        let system = cs.borrow().ok_or_else(|| {
            ProofError::WitnessComputation(WitnessFailure::Synthesis(
                "constraint system is still shared".into(),
            ))
        })?;
        // Slot 0 is the constant one.
        let public_inputs = system
            .instance_assignment
            .get(1..)
            .map(<[Fr]>::to_vec)
            .unwrap_or_default();
        Ok(public_inputs)
    }
}

fn synthesis_failure(e: SynthesisError) -> ProofError {
    ProofError::WitnessComputation(WitnessFailure::Synthesis(e.to_string()))
}

impl ProofSystem for Groth16ProofSystem {
    type Proof = RawProof;
    type VerifyingKey = VerifyingKey<Bn254>;
    type ProvingKey = ProvingKey<Bn254>;
    type Circuit = AnswerCircuit;

    fn prove(
        &self,
        pk: &Self::ProvingKey,
        circuit: &Self::Circuit,
    ) -> Result<Self::Proof, ProofError> {
        let public_inputs = self.compute_witness(circuit)?;
        let expected = pk.vk.gamma_abc_g1.len().saturating_sub(1);
        if public_inputs.len() != expected {
            return Err(ProofError::Proving(format!(
                "proving key expects {expected} public inputs, circuit allocates {}",
                public_inputs.len()
            )));
        }

        let proof = Groth16::<Bn254>::prove(pk, circuit.clone(), &mut OsRng)
            .map_err(|e| ProofError::Proving(e.to_string()))?;
        RawProof::from_groth16(&proof, &public_inputs)
    }

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[BigUint],
    ) -> Result<bool, VerifyError> {
        let formatted =
            format_proof(proof).map_err(|e| VerifyError::MalformedProof(e.to_string()))?;
        let prepared = Groth16::<Bn254>::process_vk(vk)
            .map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        crate::verifier::verify_prepared(&prepared, &formatted, public_inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ark_std::rand::rngs::StdRng;
    use ark_std::rand::SeedableRng;
    use zkq_crypto::{circom_parameters, commit_field, from_field};

    fn setup() -> (ProvingKey<Bn254>, VerifyingKey<Bn254>) {
        let params = Arc::new(circom_parameters().unwrap());
        Groth16::<Bn254>::circuit_specific_setup(
            AnswerCircuit::blank(params),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap()
    }

    fn circuit(secret: u64, identity: u64, commitment: Fr) -> AnswerCircuit {
        let params = Arc::new(circom_parameters().unwrap());
        AnswerCircuit::new(params, Fr::from(secret), Fr::from(identity), commitment)
    }

    // ── Witness ─────────────────────────────────────────────────────

    #[test]
    fn witness_returns_public_inputs_in_order() {
        let h = commit_field(Fr::from(77u64)).unwrap();
        let inputs = Groth16ProofSystem
            .compute_witness(&circuit(77, 5, h))
            .unwrap();
        assert_eq!(inputs, vec![Fr::from(5u64), h, h]);
    }

    #[test]
    fn witness_rejects_wrong_secret() {
        let h = commit_field(Fr::from(77u64)).unwrap();
        let err = Groth16ProofSystem
            .compute_witness(&circuit(78, 5, h))
            .unwrap_err();
        assert!(err.is_wrong_answer());
    }

    // ── Prove / verify ──────────────────────────────────────────────

    #[test]
    fn prove_then_verify() {
        let (pk, vk) = setup();
        let h = commit_field(Fr::from(1234u64)).unwrap();
        let raw = Groth16ProofSystem.prove(&pk, &circuit(1234, 42, h)).unwrap();
        assert_eq!(raw.inputs.len(), 3);

        let inputs = vec![BigUint::from(42u8), from_field(&h), from_field(&h)];
        assert!(Groth16ProofSystem.verify(&vk, &raw, &inputs).unwrap());
    }

    #[test]
    fn proof_does_not_verify_for_another_identity() {
        let (pk, vk) = setup();
        let h = commit_field(Fr::from(1234u64)).unwrap();
        let raw = Groth16ProofSystem.prove(&pk, &circuit(1234, 42, h)).unwrap();

        let inputs = vec![BigUint::from(43u8), from_field(&h), from_field(&h)];
        assert!(!Groth16ProofSystem.verify(&vk, &raw, &inputs).unwrap());
    }

    #[test]
    fn prove_rejects_wrong_secret_before_proving() {
        let (pk, _) = setup();
        let h = commit_field(Fr::from(1234u64)).unwrap();
        let err = Groth16ProofSystem
            .prove(&pk, &circuit(4321, 42, h))
            .unwrap_err();
        assert!(err.is_wrong_answer());
    }

    #[test]
    fn verify_rejects_wrong_input_count() {
        let (pk, vk) = setup();
        let h = commit_field(Fr::from(9u64)).unwrap();
        let raw = Groth16ProofSystem.prove(&pk, &circuit(9, 1, h)).unwrap();
        assert!(matches!(
            Groth16ProofSystem.verify(&vk, &raw, &[BigUint::from(1u8)]),
            Err(VerifyError::MalformedProof(_))
        ));
    }
}
