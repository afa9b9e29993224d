//! Artifact store served over HTTP.
//!
//! Artifacts are fetched with one `GET` each from `{base_url}/{path}`. A
//! non-2xx status is an error carrying the status and body; nothing is
//! retried here.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{artifact_path, ArtifactError, ArtifactKind, ArtifactSource};

/// Fetches artifacts from a static file server.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a source rooted at `base_url` with a request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ArtifactError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ArtifactError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a source sharing an existing client.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        // Without a trailing slash `Url::join` would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// The store root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, circuit: &str, kind: ArtifactKind) -> Result<Url, ArtifactError> {
        let relative = artifact_path(circuit, kind)?;
        self.base_url
            .join(&relative)
            .map_err(|e| ArtifactError::InvalidUrl {
                url: format!("{}{relative}", self.base_url),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ArtifactSource for HttpSource {
    async fn fetch(&self, circuit: &str, kind: ArtifactKind) -> Result<Vec<u8>, ArtifactError> {
        let url = self.url_for(circuit, kind)?;
        let endpoint = format!("GET {url}");
        tracing::debug!(circuit, %kind, %url, "fetching artifact");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ArtifactError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ArtifactError::Status {
                endpoint,
                status,
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| ArtifactError::Http {
            endpoint,
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}
