//! Filesystem artifact store served under `/artifacts`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::service::{ArtifactError, ArtifactPublisher};

/// Writes artifacts below a root directory and exposes them under a public base URL.
pub struct LocalArtifactStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolves `key` below the root, rejecting absolute paths and traversal.
    fn resolve(&self, key: &str) -> Result<PathBuf, ArtifactError> {
        let relative = Path::new(key);

        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(ArtifactError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ArtifactPublisher for LocalArtifactStore {
    async fn publish(&self, key: &str, payload: Vec<u8>) -> Result<String, ArtifactError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ArtifactError::Storage(format!("create {}: {e}", parent.to_string_lossy()))
            })?;
        }

        // Written aside first so `/artifacts` never serves a partial file.
        let staging = path.with_extension("partial");
        tokio::fs::write(&staging, payload).await.map_err(|e| {
            ArtifactError::Storage(format!("write {}: {e}", staging.to_string_lossy()))
        })?;
        tokio::fs::rename(&staging, &path).await.map_err(|e| {
            ArtifactError::Storage(format!("rename {}: {e}", path.to_string_lossy()))
        })?;

        tracing::debug!(key, "Artifact published");

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
