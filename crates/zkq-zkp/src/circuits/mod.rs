//! # Circuit Definitions
//!
//! R1CS circuits compiled into this crate. Circuit artifacts published to
//! an artifact store only name one of these families (see
//! [`crate::artifacts::CircuitManifest`]); the constraint system itself is
//! always the one built here, so keys and circuit cannot drift apart
//! silently.
//!
//! - [`answer::AnswerCircuit`]: knowledge of a secret matching a public
//!   Poseidon commitment, bound to a public identity.
//! - [`poseidon::PoseidonGadget`]: the in-circuit commitment function.

pub mod answer;
pub mod poseidon;

pub use answer::{AnswerCircuit, ANSWER_CIRCUIT_KIND, ANSWER_PUBLIC_INPUTS};
pub use poseidon::PoseidonGadget;
