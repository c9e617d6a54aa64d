//! Application services for the task module.

mod completion;
mod extension;
mod lifecycle;
mod type_approval;

pub use completion::CompletionService;
pub use extension::ExtensionService;
pub use lifecycle::{CreateTask, TaskFilter, TaskLifecycleService, TaskServiceError};
pub use type_approval::TypeApprovalService;
