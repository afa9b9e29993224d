//! # Answer CLI — encode, commit and check answers locally.
//!
//! None of these commands touch circuit artifacts.
//!
//! ```bash
//! zkq encode "paris"
//! zkq commit "seine" --parent-secret "paris"
//! zkq commit --integer 32762643843461683
//! zkq check "paris" --commitment 1234...
//! ```

use anyhow::{Context, Result};
use clap::Args;
use zkq_core::numeric::parse_uint;
use zkq_core::{encode, Commitment, Secret};

use crate::{secret_text, EXIT_NEGATIVE};

/// Arguments shared by commands that take an answer.
#[derive(Args, Debug)]
pub struct AnswerInput {
    /// Answer text, or an integer secret with `--integer`.
    pub answer: String,

    /// Secret text of the parent question, for dependent questions.
    #[arg(long, conflicts_with = "integer")]
    pub parent_secret: Option<String>,

    /// Treat the answer as an already-encoded integer (decimal or 0x hex).
    #[arg(long)]
    pub integer: bool,
}

impl AnswerInput {
    /// The secret this input denotes.
    pub fn secret(&self) -> Result<Secret> {
        if self.integer {
            let value = parse_uint(self.answer.trim())
                .with_context(|| format!("invalid integer secret {:?}", self.answer))?;
            return Ok(Secret::from_biguint(value));
        }
        let text = secret_text(&self.answer, self.parent_secret.as_deref())?;
        Ok(encode(&text))
    }
}

/// `zkq encode` arguments.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Answer text.
    pub answer: String,

    /// Secret text of the parent question, for dependent questions.
    #[arg(long)]
    pub parent_secret: Option<String>,
}

/// `zkq commit` arguments.
#[derive(Args, Debug)]
pub struct CommitArgs {
    #[command(flatten)]
    pub input: AnswerInput,
}

/// `zkq check` arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: AnswerInput,

    /// Published commitment of the question (decimal or 0x hex).
    #[arg(long)]
    pub commitment: Commitment,
}

/// Print the integer secret of an answer.
pub fn run_encode(args: &EncodeArgs) -> Result<u8> {
    let text = secret_text(&args.answer, args.parent_secret.as_deref())?;
    let secret = encode(&text);
    if secret.byte_len_hint() > zkq_core::MAX_FIELD_SAFE_BYTES {
        tracing::warn!(
            bytes = secret.byte_len_hint(),
            "answer is longer than {} bytes and may not fit the scalar field",
            zkq_core::MAX_FIELD_SAFE_BYTES
        );
    }
    println!("{}", secret.expose_decimal());
    Ok(0)
}

/// Print the commitment of an answer.
pub fn run_commit(args: &CommitArgs) -> Result<u8> {
    let secret = args.input.secret()?;
    let commitment = zkq_crypto::commit(&secret).context("failed to compute commitment")?;
    println!("{commitment}");
    Ok(0)
}

/// Compare an answer with a published commitment.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let secret = args.input.secret()?;
    zkq_crypto::to_field(secret.as_biguint())
        .context("answer does not fit the scalar field and cannot be proven")?;
    let commitment = zkq_crypto::commit(&secret).context("failed to compute commitment")?;
    if commitment == args.commitment {
        println!("correct");
        Ok(0)
    } else {
        println!("incorrect");
        Ok(EXIT_NEGATIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(answer: &str, parent: Option<&str>, integer: bool) -> AnswerInput {
        AnswerInput {
            answer: answer.into(),
            parent_secret: parent.map(Into::into),
            integer,
        }
    }

    #[test]
    fn integer_input_is_parsed_not_encoded() {
        let secret = input("32762643843461683", None, true).secret().unwrap();
        assert_eq!(secret.expose_decimal(), "32762643843461683");
    }

    #[test]
    fn text_input_is_encoded() {
        let secret = input("ab", None, false).secret().unwrap();
        assert_eq!(secret.expose_decimal(), "24930");
    }

    #[test]
    fn invalid_integer_is_an_error() {
        assert!(input("12x", None, true).secret().is_err());
    }

    #[test]
    fn check_reports_mismatch_as_negative() {
        let commitment = zkq_crypto::commit(&encode("paris")).unwrap();
        let ok = CheckArgs {
            input: input(" paris ", None, false),
            commitment: commitment.clone(),
        };
        assert_eq!(run_check(&ok).unwrap(), 0);

        let wrong = CheckArgs {
            input: input("rome", None, false),
            commitment,
        };
        assert_eq!(run_check(&wrong).unwrap(), EXIT_NEGATIVE);
    }

    #[test]
    fn check_rejects_answer_that_cannot_be_proven() {
        let answer = "the quick brown fox jumps over the lazy dog";
        let args = CheckArgs {
            input: input(answer, None, false),
            commitment: zkq_crypto::commit(&encode(answer)).unwrap(),
        };
        let err = run_check(&args).unwrap_err();
        assert!(format!("{err:#}").contains("cannot be proven"));
    }
}
