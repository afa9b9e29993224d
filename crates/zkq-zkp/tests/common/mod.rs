//! Shared fixtures: a throwaway Groth16 key pair for the answer circuit,
//! laid out the way an artifact store publishes it.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_relations::lc;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_serialize::CanonicalSerialize;
use ark_snark::SNARK;
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use rand_core::{CryptoRng, RngCore};
use zkq_core::{encode, Commitment};
use zkq_zkp::artifacts::artifact_path;
use zkq_zkp::circuits::AnswerCircuit;
use zkq_zkp::{ArtifactKind, CircuitManifest};

pub const CIRCUIT: &str = "AnswerVerifier";

const SETUP_SEED: u64 = 0x5eed;

/// Serialized artifacts for one circuit.
pub struct Artifacts {
    pub manifest: Vec<u8>,
    pub proving_key: Vec<u8>,
    pub verification_key: Vec<u8>,
}

impl Artifacts {
    pub fn bytes(&self, kind: ArtifactKind) -> &[u8] {
        match kind {
            ArtifactKind::Circuit => &self.manifest,
            ArtifactKind::ProvingKey => &self.proving_key,
            ArtifactKind::VerificationKey => &self.verification_key,
        }
    }
}

/// Run a deterministic circuit-specific setup and serialize the result.
pub fn generate_artifacts(circuit: &str) -> Artifacts {
    generate_artifacts_with(circuit, &mut StdRng::seed_from_u64(SETUP_SEED))
}

/// Setup with fresh randomness, yielding keys unrelated to
/// [`generate_artifacts`].
pub fn generate_fresh_artifacts(circuit: &str) -> Artifacts {
    generate_artifacts_with(circuit, &mut rand_core::OsRng)
}

fn generate_artifacts_with<R: RngCore + CryptoRng>(circuit: &str, rng: &mut R) -> Artifacts {
    let params = Arc::new(zkq_crypto::circom_parameters().unwrap());
    keys_for(circuit, AnswerCircuit::blank(params), rng)
}

/// Three public inputs, each only squared. Same public shape as the answer
/// circuit, different relation.
struct SquaringCircuit;

impl ConstraintSynthesizer<Fr> for SquaringCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        for _ in 0..3 {
            let x = cs.new_input_variable(|| Ok(Fr::from(2u64)))?;
            let square = cs.new_witness_variable(|| Ok(Fr::from(4u64)))?;
            cs.enforce_constraint(lc!() + x, lc!() + x, lc!() + square)?;
        }
        Ok(())
    }
}

/// Keys for an unrelated three-input circuit, published under the answer
/// circuit's manifest.
pub fn generate_foreign_artifacts(circuit: &str) -> Artifacts {
    keys_for(circuit, SquaringCircuit, &mut StdRng::seed_from_u64(SETUP_SEED))
}

fn keys_for<C, R>(circuit: &str, blank: C, rng: &mut R) -> Artifacts
where
    C: ConstraintSynthesizer<Fr>,
    R: RngCore + CryptoRng,
{
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(blank, rng).unwrap();

    let mut proving_key = Vec::new();
    pk.serialize_compressed(&mut proving_key).unwrap();
    let mut verification_key = Vec::new();
    vk.serialize_compressed(&mut verification_key).unwrap();

    Artifacts {
        manifest: serde_json::to_vec(&CircuitManifest::answer_verifier(circuit)).unwrap(),
        proving_key,
        verification_key,
    }
}

/// Write `artifacts` below `root` in the store layout.
pub fn write_store(root: &Path, circuit: &str, artifacts: &Artifacts) {
    for kind in ArtifactKind::ALL {
        let path = root.join(artifact_path(circuit, kind).unwrap());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, artifacts.bytes(kind)).unwrap();
    }
}

/// Commitment a quiz author would publish for `answer`.
pub fn commitment_for(answer: &str) -> Commitment {
    zkq_crypto::commit(&encode(answer)).unwrap()
}
