//! # zkq-core — Foundational Types for Answer-Chain Proofs
//!
//! This crate defines the values that flow between a user's free-text answer
//! and the zero-knowledge circuit that attests to it. Every other crate in the
//! workspace depends on `zkq-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for every integer role.** [`Secret`], [`Commitment`] and
//!    [`PublicIdentity`] are all arbitrary-precision unsigned integers, but
//!    they are never interchangeable. A secret cannot be passed where a
//!    commitment is expected.
//!
//! 2. **One encoding.** [`encode()`] is the only path from text to a
//!    [`Secret`]. The same bytes always produce the same integer, off-chain
//!    and inside the circuit.
//!
//! 3. **Parent first.** [`compose()`] is the only place a dependent secret
//!    is derived. The parent's secret text always precedes the child's.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkq-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod chain;
pub mod error;
pub mod identity;
pub mod numeric;
pub mod secret;

// Re-export primary types for ergonomic imports.
pub use chain::{compose, resolve_secret_text, AnswerBook, QuestionGraph};
pub use error::{ChainError, EncodingError};
pub use identity::PublicIdentity;
pub use secret::{encode, normalize_answer, Commitment, Secret, MAX_FIELD_SAFE_BYTES};
