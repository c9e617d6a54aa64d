//! Ports exposed by the task module.

mod attachments;
mod repository;

pub use attachments::{AttachmentKey, AttachmentStore, AttachmentStoreError};
pub use repository::{
    CommentRepository, CompletionRequestRepository, ExtensionRequestRepository, TaskRepository,
    TaskRepositoryError,
};
