//! # Proof CLI — generate and verify answer proofs.
//!
//! Artifact store, circuit name and concurrency come from the `ZKQ_*`
//! environment variables (see `zkq_zkp::ProverConfig::from_env`); flags
//! override them.
//!
//! ```bash
//! zkq prove paris --commitment 1234 --identity 0xab12 --out proof.json
//! zkq verify proof.json --identity 0xab12 --commitment 1234
//! zkq verify proof.json --verification-key keys/AnswerVerifier.verification.key
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use zkq_core::{Commitment, PublicIdentity};
use zkq_zkp::{
    AnswerProver, AnswerVerifier, ArtifactKind, ArtifactStore, Proof, ProverConfig,
};

use crate::answer::AnswerInput;
use crate::EXIT_NEGATIVE;

/// Artifact store overrides.
#[derive(Args, Debug, Default)]
pub struct StoreOptions {
    /// Local artifact directory (overrides ZKQ_ARTIFACT_DIR / ZKQ_ARTIFACT_URL).
    #[arg(long, conflicts_with = "artifact_url")]
    pub artifact_dir: Option<PathBuf>,

    /// HTTP artifact base URL (overrides ZKQ_ARTIFACT_URL).
    #[arg(long)]
    pub artifact_url: Option<String>,

    /// Circuit name (overrides ZKQ_CIRCUIT).
    #[arg(long)]
    pub circuit: Option<String>,
}

impl StoreOptions {
    /// Environment configuration with flag overrides applied.
    pub fn config(&self) -> Result<ProverConfig> {
        let base = ProverConfig::from_env().context("invalid ZKQ_* environment")?;
        self.apply(base)
    }

    /// `base` with these flags applied on top.
    pub fn apply(&self, mut config: ProverConfig) -> Result<ProverConfig> {
        if let Some(dir) = &self.artifact_dir {
            config.store = ArtifactStore::Directory(dir.clone());
        }
        if let Some(url) = &self.artifact_url {
            config.store = ProverConfig::http(url)
                .context("invalid --artifact-url")?
                .store;
        }
        if let Some(circuit) = &self.circuit {
            zkq_zkp::artifacts::validate_circuit_name(circuit)?;
            config.circuit = circuit.clone();
        }
        Ok(config)
    }
}

/// `zkq prove` arguments.
#[derive(Args, Debug)]
pub struct ProveArgs {
    #[command(flatten)]
    pub input: AnswerInput,

    /// Published commitment of the question (decimal or 0x hex).
    #[arg(long)]
    pub commitment: Commitment,

    /// Prover identity: account address or integer (decimal or 0x hex).
    #[arg(long)]
    pub identity: PublicIdentity,

    /// Print the backend's raw proof instead of the verifier shape.
    #[arg(long)]
    pub raw: bool,

    /// Write the proof to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreOptions,
}

/// `zkq verify` arguments.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof file in the verifier shape.
    pub proof: PathBuf,

    /// Verification key file; defaults to the one in the artifact store.
    #[arg(long)]
    pub verification_key: Option<PathBuf>,

    /// Also require the proof to be for this identity.
    #[arg(long, requires = "commitment")]
    pub identity: Option<PublicIdentity>,

    /// Also require the proof to be for this question.
    #[arg(long, requires = "identity")]
    pub commitment: Option<Commitment>,

    #[command(flatten)]
    pub store: StoreOptions,
}

/// Generate a proof for an answer.
pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let config = args.store.config()?;
    let secret = args.input.secret()?;

    let rt = runtime()?;
    let prover = AnswerProver::from_config(&config).context("failed to open artifact store")?;

    let output = rt.block_on(async {
        if args.raw {
            prover
                .generate_raw_proof(&secret, &args.identity, &args.commitment)
                .await
                .map(|raw| serde_json::to_string_pretty(&raw))
        } else {
            prover
                .generate_proof(&secret, &args.identity, &args.commitment)
                .await
                .map(|proof| serde_json::to_string_pretty(&proof))
        }
    });

    let json = match output {
        Ok(json) => json.context("failed to serialize proof")?,
        Err(e) if e.is_wrong_answer() => {
            eprintln!("incorrect answer: no proof generated");
            return Ok(EXIT_NEGATIVE);
        }
        Err(e) => return Err(e).context("proof generation failed"),
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, json.as_bytes())
                .with_context(|| format!("failed to write proof: {}", path.display()))?;
            tracing::info!(path = %path.display(), "proof written");
        }
        None => println!("{json}"),
    }
    Ok(0)
}

/// Verify a formatted proof off-chain.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let text = std::fs::read_to_string(&args.proof)
        .with_context(|| format!("failed to read proof: {}", args.proof.display()))?;
    let proof: Proof = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse proof: {}", args.proof.display()))?;

    let key_bytes = match &args.verification_key {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read verification key: {}", path.display()))?,
        None => {
            let config = args.store.config()?;
            let source = config.artifact_source()?;
            runtime()?
                .block_on(source.fetch(&config.circuit, ArtifactKind::VerificationKey))
                .context("failed to fetch verification key")?
        }
    };
    let verifier = AnswerVerifier::from_verification_key_bytes(&key_bytes)?;

    let valid = match (&args.identity, &args.commitment) {
        (Some(identity), Some(commitment)) => verifier.verify_answer(&proof, identity, commitment)?,
        _ => verifier.verify(&proof)?,
    };

    if valid {
        println!("valid");
        Ok(0)
    } else {
        println!("invalid");
        Ok(EXIT_NEGATIVE)
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers.min(4))
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
