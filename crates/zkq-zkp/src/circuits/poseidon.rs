//! # In-Circuit Poseidon
//!
//! R1CS gadget for the arity-1 circom Poseidon hash. Round constants, MDS
//! matrix and round counts come from [`zkq_crypto::circom_parameters`], the
//! same set the native hash uses, so the gadget output equals
//! [`zkq_crypto::commit_field`] for every input.
//!
//! Round structure: `full_rounds / 2` full rounds, then all partial rounds,
//! then the remaining full rounds. Each round adds the round constants,
//! applies `x^5` (to every lane in full rounds, to lane 0 in partial
//! rounds) and multiplies by the MDS matrix.

use std::sync::Arc;

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_relations::r1cs::SynthesisError;
use zkq_crypto::PoseidonParameters;

/// Poseidon permutation over constraint-system variables.
#[derive(Clone)]
pub struct PoseidonGadget {
    params: Arc<PoseidonParameters<Fr>>,
}

impl PoseidonGadget {
    /// Build a gadget over a parameter set.
    pub fn new(params: Arc<PoseidonParameters<Fr>>) -> Self {
        Self { params }
    }

    /// Hash a single field element.
    pub fn hash(&self, input: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
        let params = &*self.params;
        let width = params.width;
        if width != 2 || params.alpha != 5 {
            return Err(SynthesisError::Unsatisfiable);
        }

        // Lane 0 is the zero capacity element.
        let mut state = vec![FpVar::<Fr>::zero(), input.clone()];

        let half_full = params.full_rounds / 2;
        let partial_end = half_full + params.partial_rounds;
        let total = params.full_rounds + params.partial_rounds;

        for round in 0..total {
            for (i, lane) in state.iter_mut().enumerate() {
                let constant = params
                    .ark
                    .get(round * width + i)
                    .ok_or(SynthesisError::Unsatisfiable)?;
                *lane += *constant;
            }

            if round < half_full || round >= partial_end {
                for lane in state.iter_mut() {
                    *lane = sbox(lane)?;
                }
            } else {
                state[0] = sbox(&state[0])?;
            }

            state = self.mix(&state)?;
        }

        Ok(state[0].clone())
    }

    fn mix(&self, state: &[FpVar<Fr>]) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
        self.params
            .mds
            .iter()
            .map(|row| {
                if row.len() != state.len() {
                    return Err(SynthesisError::Unsatisfiable);
                }
                Ok(row
                    .iter()
                    .zip(state)
                    .fold(FpVar::<Fr>::zero(), |acc, (coeff, lane)| {
                        acc + lane.clone() * *coeff
                    }))
            })
            .collect()
    }
}

/// `x^5` with three multiplication constraints.
fn sbox(x: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let x2 = x.square()?;
    let x4 = x2.square()?;
    Ok(x4 * x)
}
