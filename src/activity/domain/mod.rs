//! Domain types for activities, their message streams, and the audit
//! trail.

mod activity;
mod audit;
mod error;
mod ids;
mod message;

pub use activity::{Activity, ActivityKind, ActivityName};
pub use audit::{AuditEntry, AuditEntryId};
pub use error::{ActivityDomainError, ParseActivityKindError};
pub use ids::{ActivityId, MessageId};
pub use message::{ActivityMessage, MessageKind};
