//! Best-effort side channels: audit trail and user notifications.
//!
//! Core operations never fail because a sink failed. Services call the
//! `emit_*` helpers, which log sink errors at `warn` and discard them.

use crate::activity::domain::AuditEntry;
use crate::identity::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised by an audit or notification sink.
#[derive(Debug, Clone, Error)]
#[error("event sink failure: {0}")]
pub struct EventSinkError(Arc<dyn std::error::Error + Send + Sync>);

impl EventSinkError {
    /// Wraps an arbitrary backend error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

/// Append-only record of governance actions.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Records one audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError`] when the backend rejects the entry.
    async fn record(&self, entry: AuditEntry) -> Result<(), EventSinkError>;
}

/// Delivery of short notices to individual users.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends one notice to one recipient.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError`] when delivery fails.
    async fn notify(&self, recipient: UserId, notice: &str) -> Result<(), EventSinkError>;
}

/// Records an audit entry, swallowing sink failures.
pub async fn emit_audit(trail: &impl AuditTrail, entry: AuditEntry) {
    let action = entry.action().to_owned();
    if let Err(err) = trail.record(entry).await {
        tracing::warn!(%action, error = %err, "audit entry dropped");
    }
}

/// Sends a notice to each recipient, swallowing delivery failures.
pub async fn emit_notice<I>(sink: &impl NotificationSink, recipients: I, notice: &str)
where
    I: IntoIterator<Item = UserId>,
{
    for recipient in recipients {
        if let Err(err) = sink.notify(recipient, notice).await {
            tracing::warn!(%recipient, error = %err, "notification dropped");
        }
    }
}
