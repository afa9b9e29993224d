//! Prover configuration.
//!
//! Selects the artifact store, circuit name and proving concurrency.
//! Defaults serve artifacts from `./public`. Override via environment
//! variables or explicit construction.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::artifacts::{ArtifactError, ArtifactSource, DirectorySource, HttpSource};

/// Circuit name used when none is configured.
pub const DEFAULT_CIRCUIT: &str = "AnswerVerifier";

/// Artifact directory used when no store is configured.
pub const DEFAULT_ARTIFACT_DIR: &str = "./public";

/// HTTP fetch timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Where circuit artifacts are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStore {
    /// An HTTP base URL.
    Http(Url),
    /// A local directory root.
    Directory(PathBuf),
}

/// Configuration for an [`AnswerProver`](crate::AnswerProver).
#[derive(Debug, Clone)]
pub struct ProverConfig {
    /// Artifact store.
    pub store: ArtifactStore,
    /// Circuit name to load.
    pub circuit: String,
    /// Maximum number of proofs computed at once.
    pub max_concurrent_proofs: NonZeroUsize,
    /// Timeout for each HTTP artifact fetch, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            store: ArtifactStore::Directory(PathBuf::from(DEFAULT_ARTIFACT_DIR)),
            circuit: DEFAULT_CIRCUIT.to_string(),
            max_concurrent_proofs: default_parallelism(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl ProverConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ZKQ_ARTIFACT_URL` (HTTP store; takes precedence over the directory)
    /// - `ZKQ_ARTIFACT_DIR` (default: `./public`)
    /// - `ZKQ_CIRCUIT` (default: `AnswerVerifier`)
    /// - `ZKQ_MAX_CONCURRENT_PROOFS` (default: available parallelism)
    /// - `ZKQ_FETCH_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let store = match std::env::var("ZKQ_ARTIFACT_URL") {
            Ok(raw) => ArtifactStore::Http(parse_url("ZKQ_ARTIFACT_URL", &raw)?),
            Err(_) => ArtifactStore::Directory(PathBuf::from(
                std::env::var("ZKQ_ARTIFACT_DIR")
                    .unwrap_or_else(|_| DEFAULT_ARTIFACT_DIR.to_string()),
            )),
        };

        let circuit = std::env::var("ZKQ_CIRCUIT").unwrap_or_else(|_| DEFAULT_CIRCUIT.to_string());
        crate::artifacts::validate_circuit_name(&circuit)
            .map_err(|_| ConfigError::InvalidCircuit(circuit.clone()))?;

        let max_concurrent_proofs = match std::env::var("ZKQ_MAX_CONCURRENT_PROOFS") {
            Ok(raw) => raw
                .parse::<NonZeroUsize>()
                .map_err(|e| ConfigError::InvalidNumber("ZKQ_MAX_CONCURRENT_PROOFS".into(), e.to_string()))?,
            Err(_) => default_parallelism(),
        };

        let fetch_timeout_secs = match std::env::var("ZKQ_FETCH_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidNumber("ZKQ_FETCH_TIMEOUT_SECS".into(), e.to_string()))?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Self {
            store,
            circuit,
            max_concurrent_proofs,
            fetch_timeout_secs,
        })
    }

    /// Configuration reading artifacts from a local directory.
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self {
            store: ArtifactStore::Directory(root.into()),
            ..Self::default()
        }
    }

    /// Configuration fetching artifacts over HTTP.
    pub fn http(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            store: ArtifactStore::Http(parse_url("base_url", base_url)?),
            ..Self::default()
        })
    }

    /// HTTP fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Build the artifact source this configuration selects.
    pub fn artifact_source(&self) -> Result<Arc<dyn ArtifactSource>, ArtifactError> {
        Ok(match &self.store {
            ArtifactStore::Http(url) => Arc::new(HttpSource::new(url.clone(), self.fetch_timeout())?),
            ArtifactStore::Directory(root) => Arc::new(DirectorySource::new(root.clone())),
        })
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn default_parallelism() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1}")]
    InvalidNumber(String, String),
    #[error("invalid circuit name {0:?}")]
    InvalidCircuit(String),
}
