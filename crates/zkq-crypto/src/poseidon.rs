//! # Poseidon Commitments
//!
//! The commitment function `H(secret)` is Poseidon over the BN254 scalar
//! field with the circomlib parameter set for a single input:
//!
//! - state width `t = 2` (one capacity lane initialized to zero, one input),
//! - 8 full rounds and 56 partial rounds,
//! - S-box `x^5`,
//! - output is lane 0 of the final state.
//!
//! The native hash is provided by `light-poseidon`, whose circom mode is
//! bit-compatible with circomlibjs. The same parameter set is exported via
//! [`circom_parameters()`] so the R1CS gadget in `zkq-zkp` computes exactly
//! the permutation evaluated here.
//!
//! ## Security Invariant
//!
//! Inputs are reduced modulo the field order before hashing, as circomlib
//! does. Two secrets congruent mod `p` therefore share a commitment. Answers
//! of at most [`zkq_core::MAX_FIELD_SAFE_BYTES`] bytes never wrap.

use ark_bn254::Fr;
use light_poseidon::parameters::bn254_x5;
use light_poseidon::{Poseidon, PoseidonHasher, PoseidonParameters};
use zkq_core::{encode, normalize_answer, Commitment, Secret};

use crate::error::CryptoError;
use crate::field::{from_field, to_field, to_field_reduced};

/// Number of hash inputs. Width is this plus one capacity lane.
const ARITY: usize = 1;

/// Compute the public commitment of a secret.
pub fn commit(secret: &Secret) -> Result<Commitment, CryptoError> {
    let scalar = to_field_reduced(secret.as_biguint());
    let digest = commit_field(scalar)?;
    Ok(Commitment::from_biguint(from_field(&digest)))
}

/// Compute the commitment of a value already in the scalar field.
pub fn commit_field(input: Fr) -> Result<Fr, CryptoError> {
    let mut hasher = Poseidon::<Fr>::new_circom(ARITY)
        .map_err(|e| CryptoError::BackendInit(e.to_string()))?;
    hasher
        .hash(&[input])
        .map_err(|e| CryptoError::BackendInit(e.to_string()))
}

/// Check a typed answer against a published commitment.
///
/// The answer is normalized and encoded exactly as a proof would encode it,
/// so `Ok(true)` means a proof for this answer will satisfy the circuit.
/// An answer whose encoding is not a canonical scalar can never be proven,
/// even if its reduced commitment matches; it fails with
/// [`CryptoError::OutOfField`].
pub fn check_answer(answer: &str, expected: &Commitment) -> Result<bool, CryptoError> {
    let secret = encode(normalize_answer(answer));
    let scalar = to_field(secret.as_biguint())?;
    let matches = Commitment::from_biguint(from_field(&commit_field(scalar)?)) == *expected;
    tracing::debug!(matches, "local answer check");
    Ok(matches)
}

/// Round constants, MDS matrix and round counts of the arity-1 hash.
pub fn circom_parameters() -> Result<PoseidonParameters<Fr>, CryptoError> {
    bn254_x5::get_poseidon_parameters::<Fr>((ARITY + 1) as u8)
        .map_err(|e| CryptoError::BackendInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Known vectors ───────────────────────────────────────────────

    #[test]
    fn commit_known_vector() {
        let secret = Secret::from(32_762_643_843_461_683);
        assert_eq!(
            commit(&secret).unwrap().to_string(),
            "19052927052134838559015530275350142770733084377916632950657130648826802161200"
        );
    }

    #[test]
    fn commit_of_encoded_text_matches_vector() {
        assert_eq!(
            commit(&encode("test123")).unwrap(),
            "19052927052134838559015530275350142770733084377916632950657130648826802161200"
                .parse::<Commitment>()
                .unwrap()
        );
    }

    #[test]
    fn commit_one_matches_circomlib() {
        assert_eq!(
            commit(&Secret::from(1)).unwrap().to_string(),
            "18586133768512220936620570745912940619677854269274689475585506675881198879027"
        );
    }

    // ── Parameters ──────────────────────────────────────────────────

    #[test]
    fn parameters_describe_width_two_circom_hash() {
        let params = circom_parameters().unwrap();
        assert_eq!(params.width, 2);
        assert_eq!(params.full_rounds, 8);
        assert_eq!(params.partial_rounds, 56);
        assert_eq!(params.alpha, 5);
        assert_eq!(params.ark.len(), (8 + 56) * 2);
        assert_eq!(params.mds.len(), 2);
    }

    // ── Reduction and self-check ────────────────────────────────────

    #[test]
    fn inputs_are_reduced_mod_p() {
        let p = crate::field::scalar_modulus();
        let wrapped = Secret::from_biguint(p + 7u32);
        assert_eq!(commit(&wrapped).unwrap(), commit(&Secret::from(7)).unwrap());
    }

    #[test]
    fn check_answer_accepts_matching_answer_with_whitespace() {
        let expected = commit(&encode("test123")).unwrap();
        assert!(check_answer("  test123\n", &expected).unwrap());
        assert!(!check_answer("test124", &expected).unwrap());
    }

    #[test]
    fn check_answer_rejects_answer_beyond_the_field() {
        let answer = "the quick brown fox jumps over the lazy dog";
        // The reduced commitment matches, but no witness exists for it.
        let expected = commit(&encode(answer)).unwrap();
        assert!(matches!(
            check_answer(answer, &expected),
            Err(CryptoError::OutOfField(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn commit_is_deterministic(text in "[a-z0-9]{0,31}") {
            let secret = encode(&text);
            prop_assert_eq!(commit(&secret).unwrap(), commit(&secret).unwrap());
        }

        #[test]
        fn commitment_is_canonical(text in "\\PC{0,31}") {
            let c = commit(&encode(&text)).unwrap();
            prop_assert!(c.as_biguint() < &crate::field::scalar_modulus());
        }
    }
}
