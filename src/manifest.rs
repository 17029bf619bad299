use crate::config::{Settings, USER_AGENT};
use crate::error::ZvmError;
use crate::types::Manifest;
use reqwest::Client;
use std::path::PathBuf;

/// Fetches the remote version manifest and keeps a raw copy on disk.
pub struct ManifestStore<'a> {
    client: &'a Client,
    url: String,
    cache_path: PathBuf,
}

impl<'a> ManifestStore<'a> {
    pub fn new(client: &'a Client, settings: &Settings) -> Self {
        Self {
            client,
            url: settings.manifest_url.clone(),
            cache_path: settings.manifest_cache_path(),
        }
    }

    /// Downloads, persists and decodes the manifest.
    ///
    /// The cache is overwritten before decoding, so a malformed payload is
    /// still left on disk for inspection.
    pub async fn fetch(&self) -> Result<Manifest, ZvmError> {
        tracing::debug!("Fetching version manifest from: {}", self.url);

        let fetch_failed = |source: reqwest::Error| ZvmError::ManifestFetchFailed {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_failed)?;
        let payload = response.bytes().await.map_err(fetch_failed)?;

        tokio::fs::write(&self.cache_path, &payload)
            .await
            .map_err(|source| ZvmError::ManifestPersistFailed {
                path: self.cache_path.clone(),
                source,
            })?;
        tracing::debug!(
            "Cached {} bytes of manifest at {}",
            payload.len(),
            self.cache_path.display()
        );

        let manifest = decode(&payload)?;
        if manifest.is_empty() {
            tracing::warn!("Manifest at {} lists no versions", self.url);
        }
        tracing::info!("Manifest lists {} versions", manifest.len());
        Ok(manifest)
    }

    /// Reads the copy written by the last successful [`fetch`](Self::fetch).
    pub async fn load_cached(&self) -> Result<Manifest, ZvmError> {
        let payload = tokio::fs::read(&self.cache_path).await.map_err(|source| {
            ZvmError::ManifestCacheUnreadable {
                path: self.cache_path.clone(),
                source,
            }
        })?;
        decode(&payload)
    }
}

fn decode(payload: &[u8]) -> Result<Manifest, ZvmError> {
    serde_json::from_slice(payload).map_err(ZvmError::ManifestDecodeFailed)
}
