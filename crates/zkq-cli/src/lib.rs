//! # zkq-cli — CLI Tool for Answer-Chain Proofs
//!
//! Provides the `zkq` command-line interface over the answer-proof crates.
//!
//! ## Subcommands
//!
//! - `zkq encode`: answer text to its integer secret.
//! - `zkq commit`: Poseidon commitment of an answer.
//! - `zkq check`: compare an answer against a published commitment.
//! - `zkq chain`: compose a dependent question's secret text.
//! - `zkq prove`: generate a Groth16 proof for an answer.
//! - `zkq verify`: check a formatted proof off-chain.
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | Error (bad input, missing artifacts, I/O)        |
//! | 2    | Negative result (wrong answer, invalid proof)    |
//!
//! ```bash
//! zkq commit "paris"
//! zkq prove seine --parent-secret paris --commitment 1234 --identity 0xab12
//! zkq verify proof.json --identity 0xab12 --commitment 1234
//! ```

pub mod answer;
pub mod chain;
pub mod proof;

/// Exit code for a negative result.
pub const EXIT_NEGATIVE: u8 = 2;

/// Resolve the secret text for an answer, composing it with the parent's
/// secret text when one is given.
pub fn secret_text(answer: &str, parent_secret: Option<&str>) -> anyhow::Result<String> {
    let answer = zkq_core::normalize_answer(answer);
    match parent_secret {
        Some(parent) => Ok(zkq_core::compose(
            Some(zkq_core::normalize_answer(parent)),
            answer,
        )?),
        None => Ok(answer.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_answer_is_trimmed() {
        assert_eq!(secret_text("  paris ", None).unwrap(), "paris");
    }

    #[test]
    fn dependent_answer_is_composed_parent_first() {
        assert_eq!(secret_text("seine", Some(" paris")).unwrap(), "parisseine");
    }
}
