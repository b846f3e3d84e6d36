//! Artifact publisher port.

use async_trait::async_trait;

/// Errors raised while publishing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Invalid artifact key: {0}")]
    InvalidKey(String),

    #[error("Artifact storage error: {0}")]
    Storage(String),
}

/// Publishes a generated artifact and returns its public URL.
///
/// Keys are relative, slash-separated paths such as `qr_codes/qr_b.svg`.
/// Publishing the same key twice overwrites the earlier payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactPublisher: Send + Sync {
    async fn publish(&self, key: &str, payload: Vec<u8>) -> Result<String, ArtifactError>;
}
