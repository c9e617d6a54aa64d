//! Ports exposed by the activity module.

mod events;
mod repository;

pub use events::{
    AuditTrail, EventSinkError, NotificationSink, emit_audit, emit_notice,
};
pub use repository::{ActivityRepository, ActivityRepositoryError, MessageRepository};
