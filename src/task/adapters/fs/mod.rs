//! Filesystem adapters for the task module.

mod attachments;

pub use attachments::FsAttachmentStore;
