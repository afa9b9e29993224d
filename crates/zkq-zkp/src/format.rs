//! # Proof Formatting
//!
//! Two shapes of the same Groth16 proof:
//!
//! - [`RawProof`]: what the prover emits. Coordinates are `0x`-prefixed
//!   32-byte big-endian hex strings in the layout used by ZoKrates-style
//!   tooling:
//!
//!   ```json
//!   { "scheme": "g16", "curve": "bn128",
//!     "proof": { "a": [ax, ay], "b": [[bx_im, bx_re], [by_im, by_re]], "c": [cx, cy] },
//!     "inputs": [i0, i1, i2] }
//!   ```
//!
//! - [`Proof`]: the canonical structure handed to on-chain verifiers,
//!   `{ "proof": { "a": {X, Y}, "b": {X: [im, re], Y: [im, re]}, "c": {X, Y} }, "inputs": [...] }`.
//!   Every integer is arbitrary precision and serialized as a decimal
//!   string, so no consumer can narrow it by accident.
//!
//! G2 coordinates keep the EVM precompile order (imaginary part first)
//! in both shapes. [`format_proof()`] never reorders, truncates or
//! defaults a field: a coordinate that does not parse, an unknown scheme or
//! curve tag, or a public-input count other than the answer circuit's is
//! reported as [`ProofError::MalformedRawProof`].

use ark_bn254::{Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use zkq_core::numeric::parse_uint;

use crate::circuits::ANSWER_PUBLIC_INPUTS;
use crate::traits::ProofError;

/// Scheme tag written into raw proofs.
pub const RAW_SCHEME: &str = "g16";

/// Curve tag written into raw proofs.
pub const RAW_CURVE: &str = "bn128";

/// Group elements of a raw proof, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProofPoints {
    /// G1 element `A` as `[x, y]`.
    pub a: [String; 2],
    /// G2 element `B` as `[[x_im, x_re], [y_im, y_re]]`.
    pub b: [[String; 2]; 2],
    /// G1 element `C` as `[x, y]`.
    pub c: [String; 2],
}

/// Prover output before formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProof {
    /// Proving scheme tag.
    pub scheme: String,
    /// Curve tag.
    pub curve: String,
    /// The three group elements.
    pub proof: RawProofPoints,
    /// Public inputs as hex strings, in circuit order.
    pub inputs: Vec<String>,
}

impl RawProof {
    /// Build a raw proof from a backend proof and its public inputs.
    pub fn from_groth16(
        proof: &ark_groth16::Proof<ark_bn254::Bn254>,
        inputs: &[Fr],
    ) -> Result<Self, ProofError> {
        Ok(Self {
            scheme: RAW_SCHEME.to_string(),
            curve: RAW_CURVE.to_string(),
            proof: RawProofPoints {
                a: g1_hex(&proof.a, "a")?,
                b: g2_hex(&proof.b)?,
                c: g1_hex(&proof.c, "c")?,
            },
            inputs: inputs.iter().map(field_hex).collect(),
        })
    }

    /// Parse a raw proof from JSON text. Missing or mistyped fields are
    /// reported as [`ProofError::MalformedRawProof`].
    pub fn from_json(text: &str) -> Result<Self, ProofError> {
        serde_json::from_str(text).map_err(|e| ProofError::MalformedRawProof(e.to_string()))
    }

    /// Parse a raw proof from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProofError> {
        serde_json::from_value(value).map_err(|e| ProofError::MalformedRawProof(e.to_string()))
    }
}

/// G1 point in verifier form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct G1Point {
    /// X coordinate.
    #[serde(rename = "X", with = "zkq_core::numeric::decimal")]
    pub x: BigUint,
    /// Y coordinate.
    #[serde(rename = "Y", with = "zkq_core::numeric::decimal")]
    pub y: BigUint,
}

/// G2 point in verifier form, each coordinate `[imaginary, real]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct G2Point {
    /// X coordinate.
    #[serde(rename = "X", with = "zkq_core::numeric::decimal_pair")]
    pub x: [BigUint; 2],
    /// Y coordinate.
    #[serde(rename = "Y", with = "zkq_core::numeric::decimal_pair")]
    pub y: [BigUint; 2],
}

/// The three group elements of a proof in verifier form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPoints {
    /// Group element `A`.
    pub a: G1Point,
    /// Group element `B`.
    pub b: G2Point,
    /// Group element `C`.
    pub c: G1Point,
}

/// A proof in the shape consumed by on-chain verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// The group elements.
    pub proof: ProofPoints,
    /// Public inputs in circuit order.
    #[serde(with = "zkq_core::numeric::decimal_vec")]
    pub inputs: Vec<BigUint>,
}

/// Normalize a raw prover output into the verifier shape.
pub fn format_proof(raw: &RawProof) -> Result<Proof, ProofError> {
    if raw.scheme != RAW_SCHEME {
        return Err(ProofError::MalformedRawProof(format!(
            "unsupported scheme {:?}",
            raw.scheme
        )));
    }
    if raw.curve != RAW_CURVE {
        return Err(ProofError::MalformedRawProof(format!(
            "unsupported curve {:?}",
            raw.curve
        )));
    }
    if raw.inputs.len() != ANSWER_PUBLIC_INPUTS {
        return Err(ProofError::MalformedRawProof(format!(
            "expected {ANSWER_PUBLIC_INPUTS} public inputs, got {}",
            raw.inputs.len()
        )));
    }

    let points = &raw.proof;
    let inputs = raw
        .inputs
        .iter()
        .enumerate()
        .map(|(i, s)| coordinate(s, &format!("inputs[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Proof {
        proof: ProofPoints {
            a: G1Point {
                x: coordinate(&points.a[0], "proof.a[0]")?,
                y: coordinate(&points.a[1], "proof.a[1]")?,
            },
            b: G2Point {
                x: [
                    coordinate(&points.b[0][0], "proof.b[0][0]")?,
                    coordinate(&points.b[0][1], "proof.b[0][1]")?,
                ],
                y: [
                    coordinate(&points.b[1][0], "proof.b[1][0]")?,
                    coordinate(&points.b[1][1], "proof.b[1][1]")?,
                ],
            },
            c: G1Point {
                x: coordinate(&points.c[0], "proof.c[0]")?,
                y: coordinate(&points.c[1], "proof.c[1]")?,
            },
        },
        inputs,
    })
}

fn coordinate(value: &str, field: &str) -> Result<BigUint, ProofError> {
    parse_uint(value).map_err(|e| ProofError::MalformedRawProof(format!("{field}: {e}")))
}

fn field_hex<F: PrimeField>(value: &F) -> String {
    let bytes = value.into_bigint().to_bytes_be();
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("0x{hex}")
}

fn g1_hex(point: &G1Affine, name: &str) -> Result<[String; 2], ProofError> {
    let (x, y) = point
        .xy()
        .ok_or_else(|| ProofError::MalformedRawProof(format!("proof.{name} is the point at infinity")))?;
    Ok([field_hex::<Fq>(x), field_hex::<Fq>(y)])
}

fn g2_hex(point: &G2Affine) -> Result<[[String; 2]; 2], ProofError> {
    let (x, y) = point
        .xy()
        .ok_or_else(|| ProofError::MalformedRawProof("proof.b is the point at infinity".into()))?;
    Ok([fq2_hex(x), fq2_hex(y)])
}

fn fq2_hex(value: &Fq2) -> [String; 2] {
    [field_hex(&value.c1), field_hex(&value.c0)]
}
