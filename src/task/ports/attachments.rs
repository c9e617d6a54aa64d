//! Storage port for completion proof documents.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Opaque reference to a stored proof document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachmentKey(String);

impl AttachmentKey {
    /// Wraps a storage-assigned key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttachmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors surfaced by attachment storage adapters.
#[derive(Debug, Clone, Error)]
pub enum AttachmentStoreError {
    /// No document matches the key.
    #[error("attachment not found: {0}")]
    NotFound(AttachmentKey),
    /// Backend failure.
    #[error("attachment storage failure: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentStoreError {
    /// Wraps an arbitrary backend error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

/// Content-addressed storage for proof documents.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Saves a document, returning the key to retrieve it later. The
    /// original filename is retained only for its extension.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::Storage`] on backend failure.
    async fn save(&self, filename: &str, content: &[u8])
    -> Result<AttachmentKey, AttachmentStoreError>;

    /// Loads a document by key.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::NotFound`] when no document
    /// matches the key.
    async fn open(&self, key: &AttachmentKey) -> Result<Vec<u8>, AttachmentStoreError>;
}
