//! # Error Types
//!
//! Errors raised while turning answer text into circuit-ready integers and
//! while deriving dependent secrets. All errors use `thiserror` so callers
//! can match on the category and still render a readable message.
//!
//! ## Design
//!
//! - A missing dependency answer is a precondition failure the caller can
//!   recover from (answer the parent question first). It is never folded
//!   into "no dependency".
//! - Encoding of text is total; [`EncodingError`] only covers integer
//!   literals that cannot be parsed and secrets too wide for a target field.

use thiserror::Error;

use crate::secret::Commitment;

/// Error while representing a value as an unsigned integer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The string is not a decimal or `0x`-prefixed hexadecimal integer.
    #[error("invalid unsigned integer literal: {0:?}")]
    InvalidInteger(String),

    /// The value does not fit the field it must be embedded in.
    #[error("value is {bits} bits wide but must be below the field modulus ({modulus_bits} bits)")]
    ExceedsField {
        /// Bit length of the offending value.
        bits: u64,
        /// Bit length of the field modulus.
        modulus_bits: u32,
    },
}

/// Error while resolving or composing a dependency chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The parent question's secret text is not known to the caller.
    #[error("dependency answer is missing{}", describe_dependency(.dependency))]
    MissingDependencyAnswer {
        /// The parent question, when the caller resolved it through a graph.
        dependency: Option<Commitment>,
    },

    /// A question was linked to itself.
    #[error("question {0} cannot depend on itself")]
    SelfDependency(Commitment),

    /// Linking or walking the graph would revisit a question.
    #[error("dependency cycle detected at question {0}")]
    DependencyCycle(Commitment),

    /// The question already has a different dependency.
    #[error("question {question} already depends on {existing}")]
    DependencyAlreadySet {
        /// The dependent question.
        question: Commitment,
        /// Its existing parent.
        existing: Commitment,
    },

    /// The question is not part of the graph.
    #[error("unknown question {0}")]
    UnknownQuestion(Commitment),
}

fn describe_dependency(dependency: &Option<Commitment>) -> String {
    match dependency {
        Some(question) => format!(" for parent question {question}"),
        None => String::new(),
    }
}
