//! Artifact store on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{artifact_path, ArtifactError, ArtifactKind, ArtifactSource};

/// Serves artifacts from a directory laid out like the HTTP store.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve artifacts below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactSource for DirectorySource {
    async fn fetch(&self, circuit: &str, kind: ArtifactKind) -> Result<Vec<u8>, ArtifactError> {
        let path = self.root.join(artifact_path(circuit, kind)?);
        tracing::debug!(circuit, %kind, path = %path.display(), "reading artifact");
        tokio::fs::read(&path)
            .await
            .map_err(|source| ArtifactError::Io { path, source })
    }
}
