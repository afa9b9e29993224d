//! # zkq CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkq_cli::answer::{run_check, run_commit, run_encode, CheckArgs, CommitArgs, EncodeArgs};
use zkq_cli::chain::{run_chain, ChainArgs};
use zkq_cli::proof::{run_prove, run_verify, ProveArgs, VerifyArgs};

/// Answer-chain proof toolchain.
///
/// Encodes answers, computes Poseidon commitments, composes dependent
/// question secrets, and generates and verifies Groth16 answer proofs.
#[derive(Parser, Debug)]
#[command(name = "zkq", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the integer secret of an answer.
    Encode(EncodeArgs),

    /// Print the Poseidon commitment of an answer.
    Commit(CommitArgs),

    /// Check an answer against a published commitment.
    Check(CheckArgs),

    /// Compose or resolve dependent question secrets.
    Chain(ChainArgs),

    /// Generate a proof of knowledge of an answer.
    Prove(ProveArgs),

    /// Verify an answer proof off-chain.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("zkq CLI starting");

    let result = match &cli.command {
        Commands::Encode(args) => run_encode(args),
        Commands::Commit(args) => run_commit(args),
        Commands::Check(args) => run_check(args),
        Commands::Chain(args) => run_chain(args),
        Commands::Prove(args) => run_prove(args),
        Commands::Verify(args) => run_verify(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_commit_with_parent() {
        let cli = Cli::try_parse_from(["zkq", "commit", "seine", "--parent-secret", "paris"]).unwrap();
        if let Commands::Commit(args) = cli.command {
            assert_eq!(args.input.answer, "seine");
            assert_eq!(args.input.parent_secret.as_deref(), Some("paris"));
            assert!(!args.input.integer);
        } else {
            panic!("expected commit");
        }
    }

    #[test]
    fn cli_parse_integer_conflicts_with_parent() {
        let result = Cli::try_parse_from([
            "zkq",
            "commit",
            "12",
            "--integer",
            "--parent-secret",
            "paris",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_prove() {
        let cli = Cli::try_parse_from([
            "zkq",
            "-vv",
            "prove",
            "paris",
            "--commitment",
            "1234",
            "--identity",
            "0xff",
            "--artifact-dir",
            "public",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Prove(args) = cli.command {
            assert_eq!(args.commitment, zkq_core::Commitment::from(1234u64));
            assert_eq!(args.identity, zkq_core::PublicIdentity::from(255u64));
            assert!(!args.raw);
        } else {
            panic!("expected prove");
        }
    }

    #[test]
    fn cli_parse_prove_rejects_bad_commitment() {
        let result = Cli::try_parse_from([
            "zkq",
            "prove",
            "paris",
            "--commitment",
            "not-a-number",
            "--identity",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_verify_identity_requires_commitment() {
        let result = Cli::try_parse_from(["zkq", "verify", "proof.json", "--identity", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_chain_resolve() {
        let cli = Cli::try_parse_from([
            "zkq", "chain", "resolve", "--quiz", "quiz.json", "--question", "5", "--answer", "seine",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Chain(_)));
    }
}
