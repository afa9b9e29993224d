//! # Off-Chain Verifier
//!
//! Checks a formatted [`Proof`] against a Groth16 verification key, the way
//! the on-chain verifier contract does. Used by tooling and tests to
//! confirm that a proof will be accepted before it is submitted.
//!
//! Every coordinate is range-checked against the base field and every
//! point is checked to be on the curve and in the prime-order subgroup
//! before the pairing check runs.

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::{Groth16, PreparedVerifyingKey, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use num_bigint::BigUint;
use zkq_core::{Commitment, PublicIdentity};
use zkq_crypto::to_field;

use crate::artifacts::LoadedCircuit;
use crate::circuits::ANSWER_PUBLIC_INPUTS;
use crate::format::{G1Point, G2Point, Proof};
use crate::traits::VerifyError;

/// Verifies answer proofs against one verification key.
#[derive(Clone)]
pub struct AnswerVerifier {
    prepared: PreparedVerifyingKey<Bn254>,
}

impl AnswerVerifier {
    /// Decode a compressed verification key.
    pub fn from_verification_key_bytes(bytes: &[u8]) -> Result<Self, VerifyError> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(bytes)
            .map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        Self::from_verifying_key(&vk)
    }

    /// Prepare an already-decoded verification key.
    pub fn from_verifying_key(vk: &VerifyingKey<Bn254>) -> Result<Self, VerifyError> {
        if vk.gamma_abc_g1.len() != ANSWER_PUBLIC_INPUTS + 1 {
            return Err(VerifyError::MalformedKey(format!(
                "key accepts {} public inputs, expected {ANSWER_PUBLIC_INPUTS}",
                vk.gamma_abc_g1.len().saturating_sub(1)
            )));
        }
        let prepared = Groth16::<Bn254>::process_vk(vk)
            .map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        Ok(Self { prepared })
    }

    /// Reuse the key of a loaded circuit.
    pub fn from_loaded(circuit: &LoadedCircuit) -> Self {
        Self {
            prepared: circuit.prepared_verifying_key().clone(),
        }
    }

    /// Check a proof against the public inputs it carries.
    pub fn verify(&self, proof: &Proof) -> Result<bool, VerifyError> {
        verify_prepared(&self.prepared, proof, &proof.inputs)
    }

    /// Check a proof and that it was made for this identity and question.
    ///
    /// Returns `Ok(false)` if the proof carries other public values.
    pub fn verify_answer(
        &self,
        proof: &Proof,
        identity: &PublicIdentity,
        commitment: &Commitment,
    ) -> Result<bool, VerifyError> {
        let expected = [identity.as_biguint(), commitment.as_biguint(), commitment.as_biguint()];
        if proof.inputs.len() != expected.len()
            || proof.inputs.iter().zip(expected).any(|(got, want)| got != want)
        {
            tracing::debug!("proof public inputs do not match the claimed statement");
            return Ok(false);
        }
        self.verify(proof)
    }
}

impl std::fmt::Debug for AnswerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerVerifier")
            .field("public_inputs", &self.prepared.vk.gamma_abc_g1.len().saturating_sub(1))
            .finish()
    }
}

/// Run the pairing check for `proof` under `public_inputs`.
pub(crate) fn verify_prepared(
    prepared: &PreparedVerifyingKey<Bn254>,
    proof: &Proof,
    public_inputs: &[BigUint],
) -> Result<bool, VerifyError> {
    let expected_inputs = prepared.vk.gamma_abc_g1.len().saturating_sub(1);
    if public_inputs.len() != expected_inputs {
        return Err(VerifyError::MalformedProof(format!(
            "expected {expected_inputs} public inputs, got {}",
            public_inputs.len()
        )));
    }

    let inputs = public_inputs
        .iter()
        .enumerate()
        .map(|(i, value)| {
            to_field(value).map_err(|e| VerifyError::MalformedProof(format!("inputs[{i}]: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let groth16_proof = to_groth16(proof)?;
    Groth16::<Bn254>::verify_with_processed_vk(prepared, &inputs, &groth16_proof)
        .map_err(|e| VerifyError::VerificationFailed(e.to_string()))
}

/// Decode and validate the group elements of a formatted proof.
pub fn to_groth16(proof: &Proof) -> Result<ark_groth16::Proof<Bn254>, VerifyError> {
    Ok(ark_groth16::Proof {
        a: g1(&proof.proof.a, "a")?,
        b: g2(&proof.proof.b)?,
        c: g1(&proof.proof.c, "c")?,
    })
}

fn base_field(value: &BigUint, name: &str) -> Result<Fq, VerifyError> {
    let modulus = BigUint::from_bytes_be(&Fq::MODULUS.to_bytes_be());
    if *value >= modulus {
        return Err(VerifyError::MalformedProof(format!(
            "{name} is not below the base field modulus"
        )));
    }
    Ok(Fq::from_be_bytes_mod_order(&value.to_bytes_be()))
}

fn g1(point: &G1Point, name: &str) -> Result<G1Affine, VerifyError> {
    let affine = G1Affine::new_unchecked(
        base_field(&point.x, &format!("proof.{name}.X"))?,
        base_field(&point.y, &format!("proof.{name}.Y"))?,
    );
    check_point(&affine, name)?;
    Ok(affine)
}

fn g2(point: &G2Point) -> Result<G2Affine, VerifyError> {
    // Coordinates are [imaginary, real].
    let x = Fq2::new(
        base_field(&point.x[1], "proof.b.X[1]")?,
        base_field(&point.x[0], "proof.b.X[0]")?,
    );
    let y = Fq2::new(
        base_field(&point.y[1], "proof.b.Y[1]")?,
        base_field(&point.y[0], "proof.b.Y[0]")?,
    );
    let affine = G2Affine::new_unchecked(x, y);
    check_point(&affine, "b")?;
    Ok(affine)
}

fn check_point<P>(point: &ark_ec::short_weierstrass::Affine<P>, name: &str) -> Result<(), VerifyError>
where
    P: ark_ec::short_weierstrass::SWCurveConfig,
{
    if point.is_zero() {
        return Err(VerifyError::MalformedProof(format!(
            "proof.{name} is the point at infinity"
        )));
    }
    if !point.is_on_curve() {
        return Err(VerifyError::MalformedProof(format!(
            "proof.{name} is not on the curve"
        )));
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(VerifyError::MalformedProof(format!(
            "proof.{name} is not in the prime-order subgroup"
        )));
    }
    Ok(())
}
