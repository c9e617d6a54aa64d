//! Error types for task domain invariants.

use super::kind::TypeApprovalStatus;
use super::procurement::ProcurementStage;
use super::request::RequestStatus;
use thiserror::Error;

/// Violations of task aggregate invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskDomainError {
    /// Task titles must be non-empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
    /// Percent shares are bounded to 0..=100.
    #[error("percent share {0} is outside 0..=100")]
    InvalidPercentShare(u8),
    /// At most one assignment per task may be marked as lead.
    #[error("a task may have at most one lead assignee")]
    MultipleLeads,
    /// Procurement stages only apply to procurement tasks.
    #[error("procurement stage set on a non-procurement task")]
    StageNotProcurement,
    /// The stage pipeline forbids this movement.
    #[error("procurement stage cannot move from '{from}' to '{to}'")]
    StageRegression {
        /// Stage the task is currently in.
        from: ProcurementStage,
        /// Stage the caller asked for.
        to: ProcurementStage,
    },
    /// Type-approval decisions require a pending gate.
    #[error("type approval is '{0}', not pending")]
    TypeApprovalNotPending(TypeApprovalStatus),
    /// Completion and extension requests are decided exactly once.
    #[error("request is '{0}', not pending")]
    RequestNotPending(RequestStatus),
    /// Extension reasons must be non-empty after trimming.
    #[error("extension reason must not be empty")]
    EmptyExtensionReason,
    /// Comments must be non-empty after trimming.
    #[error("comment must not be empty")]
    EmptyComment,
    /// Proof files are limited to a known set of document extensions.
    #[error("unsupported proof file extension: '{0}'")]
    UnsupportedProofExtension(String),
    /// Proof files are limited to 10 MiB.
    #[error("proof file of {0} bytes exceeds the size limit")]
    ProofTooLarge(u64),
}

/// Raised when a string is not a recognised task status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Raised when a string is not a recognised priority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Raised when a string is not a recognised task type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);

/// Raised when a string is not a recognised procurement stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown procurement stage: {0}")]
pub struct ParseProcurementStageError(pub String);
