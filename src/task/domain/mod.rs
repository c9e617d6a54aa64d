//! Domain types for tasks, assignments, and their review requests.

mod assignment;
mod comment;
mod error;
mod ids;
mod kind;
mod procurement;
mod proof;
mod request;
mod status;
mod task;

pub use assignment::{PercentShare, TaskAssignment, mirrored_assignee, validate_assignments};
pub use comment::TaskComment;
pub use error::{
    ParsePriorityError, ParseProcurementStageError, ParseTaskStatusError, ParseTaskTypeError,
    TaskDomainError,
};
pub use ids::{CommentId, CompletionRequestId, ExtensionRequestId, TaskId};
pub use kind::{TaskType, TypeApproval, TypeApprovalStatus};
pub use procurement::ProcurementStage;
pub use proof::{ALLOWED_PROOF_EXTENSIONS, MAX_PROOF_BYTES, validate_proof};
pub use request::{CompletionRequest, ExtensionRequest, RequestStatus};
pub use status::{Priority, TaskStatus};
pub use task::{Task, TaskDraft, TaskTitle};
