//! In-memory adapters for the task module.

mod attachments;
mod task;

pub use attachments::{InMemoryAttachmentStore, keyed_name};
pub use task::InMemoryTaskRepository;
