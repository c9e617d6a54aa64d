//! Filesystem attachment store rooted in a capability directory.
//!
//! Documents are content-addressed: the storage name is the SHA-256
//! digest of the content plus the original extension, so re-uploading
//! identical proof is idempotent and keys never collide with user input.

use crate::task::adapters::memory::keyed_name;
use crate::task::ports::{AttachmentKey, AttachmentStore, AttachmentStoreError};
use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;

/// Attachment store writing into a sandboxed directory.
#[derive(Debug, Clone)]
pub struct FsAttachmentStore {
    root: Arc<Dir>,
}

impl FsAttachmentStore {
    /// Creates a store over an already-opened capability directory.
    #[must_use]
    pub fn new(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn save(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<AttachmentKey, AttachmentStoreError> {
        let key = keyed_name(filename, content);
        self.root
            .write(&key, content)
            .map_err(AttachmentStoreError::storage)?;
        Ok(AttachmentKey::new(key))
    }

    async fn open(&self, key: &AttachmentKey) -> Result<Vec<u8>, AttachmentStoreError> {
        match self.root.read(key.as_str()) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(AttachmentStoreError::NotFound(key.clone()))
            }
            Err(err) => Err(AttachmentStoreError::storage(err)),
        }
    }
}
