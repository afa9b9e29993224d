//! # Chain CLI — dependent question secrets.
//!
//! ```bash
//! # Compose directly from the parent's secret text:
//! zkq chain compose seine --parent-secret paris
//!
//! # Resolve through a quiz file of dependency edges and known answers:
//! zkq chain resolve --quiz quiz.json --question 1234 --answer seine
//! ```
//!
//! Quiz file layout:
//!
//! ```json
//! {
//!   "edges":   [{ "question": "1234", "dependency": "5678" }],
//!   "answers": [{ "question": "5678", "secret_text": "paris" }]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;
use zkq_core::{resolve_secret_text, AnswerBook, Commitment, QuestionGraph};

use crate::secret_text;

/// Chain subcommand arguments.
#[derive(Args, Debug)]
pub struct ChainArgs {
    #[command(subcommand)]
    pub command: ChainCommand,
}

/// Available chain subcommands.
#[derive(Subcommand, Debug)]
pub enum ChainCommand {
    /// Compose a child answer with its parent's secret text.
    Compose {
        /// The child answer.
        answer: String,

        /// Secret text of the parent question.
        #[arg(long)]
        parent_secret: String,

        /// Also print the commitment of the composite.
        #[arg(long)]
        commit: bool,
    },

    /// Resolve the secret text of a question from a quiz file.
    Resolve {
        /// Quiz file with dependency edges and known answers.
        #[arg(long)]
        quiz: PathBuf,

        /// Commitment of the question being answered.
        #[arg(long)]
        question: Commitment,

        /// The typed answer.
        #[arg(long)]
        answer: String,

        /// Also print the commitment of the resolved secret.
        #[arg(long)]
        commit: bool,
    },
}

/// One dependency edge.
#[derive(Debug, Deserialize)]
pub struct QuizEdge {
    pub question: Commitment,
    pub dependency: Commitment,
}

/// One answer already known to the player.
#[derive(Debug, Deserialize)]
pub struct KnownAnswer {
    pub question: Commitment,
    pub secret_text: String,
}

/// Dependency edges and known answers of a quiz.
#[derive(Debug, Default, Deserialize)]
pub struct QuizFile {
    #[serde(default)]
    pub edges: Vec<QuizEdge>,
    #[serde(default)]
    pub answers: Vec<KnownAnswer>,
}

impl QuizFile {
    /// Read and parse a quiz file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse quiz file: {}", path.display()))
    }

    /// Build the dependency graph, rejecting cycles.
    pub fn graph(&self) -> Result<QuestionGraph> {
        let mut graph = QuestionGraph::new();
        for edge in &self.edges {
            graph
                .link(edge.question.clone(), edge.dependency.clone())
                .with_context(|| format!("invalid dependency edge {} -> {}", edge.question, edge.dependency))?;
        }
        for answer in &self.answers {
            graph.insert(answer.question.clone());
        }
        Ok(graph)
    }

    /// The known answers as an answer book.
    pub fn book(&self) -> AnswerBook {
        let mut book = AnswerBook::new();
        for answer in &self.answers {
            book.record(answer.question.clone(), answer.secret_text.clone());
        }
        book
    }
}

/// Execute the chain subcommand.
pub fn run_chain(args: &ChainArgs) -> Result<u8> {
    let (text, commit) = match &args.command {
        ChainCommand::Compose {
            answer,
            parent_secret,
            commit,
        } => (secret_text(answer, Some(parent_secret))?, *commit),
        ChainCommand::Resolve {
            quiz,
            question,
            answer,
            commit,
        } => (resolve(&QuizFile::load(quiz)?, question, answer)?, *commit),
    };

    println!("{text}");
    if commit {
        let commitment = zkq_crypto::commit(&zkq_core::encode(&text))
            .context("failed to compute commitment")?;
        println!("{commitment}");
    }
    Ok(0)
}

/// Resolve the secret text for `answer` to `question`.
pub fn resolve(quiz: &QuizFile, question: &Commitment, answer: &str) -> Result<String> {
    let graph = quiz.graph()?;
    let book = quiz.book();
    if !graph.contains(question) {
        // Questions absent from the quiz file have no dependency.
        return secret_text(answer, None);
    }
    Ok(resolve_secret_text(
        &graph,
        &book,
        question,
        zkq_core::normalize_answer(answer),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> QuizFile {
        serde_json::from_str(
            r#"{
                "edges": [{ "question": "2", "dependency": "1" }],
                "answers": [{ "question": "1", "secret_text": "paris" }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_dependent_question() {
        let text = resolve(&quiz(), &Commitment::from(2u64), " seine ").unwrap();
        assert_eq!(text, "parisseine");
    }

    #[test]
    fn unknown_question_is_a_root() {
        let text = resolve(&quiz(), &Commitment::from(9u64), "rome").unwrap();
        assert_eq!(text, "rome");
    }

    #[test]
    fn missing_parent_answer_is_an_error() {
        let mut quiz = quiz();
        quiz.answers.clear();
        let err = resolve(&quiz, &Commitment::from(2u64), "seine").unwrap_err();
        assert!(format!("{err:#}").contains("dependency answer is missing"));
    }

    #[test]
    fn cyclic_quiz_is_rejected() {
        let quiz: QuizFile = serde_json::from_str(
            r#"{ "edges": [
                { "question": "2", "dependency": "1" },
                { "question": "1", "dependency": "2" }
            ] }"#,
        )
        .unwrap();
        assert!(quiz.graph().is_err());
    }

    #[test]
    fn quiz_file_is_loaded_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.json");
        std::fs::write(&path, r#"{ "answers": [] }"#).unwrap();
        let quiz = QuizFile::load(&path).unwrap();
        assert!(quiz.edges.is_empty());
    }
}
