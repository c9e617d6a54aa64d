//! In-memory attachment store for tests.

use crate::task::ports::{AttachmentKey, AttachmentStore, AttachmentStoreError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Content-addressed attachment store backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttachmentStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryAttachmentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> AttachmentStoreError {
    AttachmentStoreError::storage(std::io::Error::other(format!("lock poisoned: {err}")))
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn save(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<AttachmentKey, AttachmentStoreError> {
        let key = keyed_name(filename, content);
        let mut blobs = self.blobs.write().map_err(lock_poisoned)?;
        blobs.insert(key.clone(), content.to_vec());
        Ok(AttachmentKey::new(key))
    }

    async fn open(&self, key: &AttachmentKey) -> Result<Vec<u8>, AttachmentStoreError> {
        let blobs = self.blobs.read().map_err(lock_poisoned)?;
        blobs
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| AttachmentStoreError::NotFound(key.clone()))
    }
}

/// Derives a storage name from the content digest plus the original
/// extension.
#[must_use]
pub fn keyed_name(filename: &str, content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if extension.is_empty() {
        format!("{digest:x}")
    } else {
        format!("{digest:x}.{extension}")
    }
}
