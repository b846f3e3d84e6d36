//! Artifact publication (QR images).
//!
//! - [`ArtifactPublisher`] - Port used by link issuance
//! - [`LocalArtifactStore`] - Filesystem implementation served by the HTTP layer

mod local_store;
mod service;

pub use local_store::LocalArtifactStore;
pub use service::{ArtifactError, ArtifactPublisher};

#[cfg(test)]
pub use service::MockArtifactPublisher;
