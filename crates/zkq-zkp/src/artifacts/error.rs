//! Artifact loading error types.
//!
//! Every variant means the artifact bundle is unavailable: the proof request
//! that needed it must abort. Nothing here is retried internally.

use std::path::PathBuf;

use zkq_crypto::CryptoError;

use super::ArtifactKind;

/// Errors from fetching or decoding circuit artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The circuit name cannot be used to address artifacts.
    #[error("invalid circuit name {0:?}: only ASCII letters, digits, '_' and '-' are allowed")]
    InvalidCircuitName(String),

    /// HTTP transport error.
    #[error("HTTP error fetching {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The artifact store returned a non-2xx status.
    #[error("artifact store {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Reading a local artifact failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The artifact store location is not a usable URL.
    #[error("invalid artifact URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The circuit manifest could not be parsed.
    #[error("malformed circuit manifest for {circuit}: {reason}")]
    MalformedManifest { circuit: String, reason: String },

    /// The manifest describes a circuit this build cannot prove.
    #[error("unsupported circuit {circuit}: {reason}")]
    Unsupported { circuit: String, reason: String },

    /// Key bytes could not be decoded or do not fit the circuit.
    #[error("malformed {kind} for {circuit}: {reason}")]
    MalformedKey {
        circuit: String,
        kind: ArtifactKind,
        reason: String,
    },

    /// The commitment parameters could not be initialized.
    #[error("commitment backend unavailable: {0}")]
    Backend(#[from] CryptoError),
}
