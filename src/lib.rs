//! Foreman: a task governance engine.
//!
//! Foreman coordinates teams, their activities, and the tasks worked
//! inside them, enforcing role-based authorization on every mutation.
//! Privileges combine a user's application-wide global role with their
//! team-scoped membership role; all gates reduce to predicates on the
//! resulting [`team::domain::EffectiveRole`].
//!
//! # Architecture
//!
//! Foreman follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, filesystem)
//!
//! # Modules
//!
//! - [`identity`]: Users and the global role axis
//! - [`team`]: Teams, memberships, invitations, and effective privileges
//! - [`activity`]: Per-team activity streams, messages, and the audit and
//!   notification side channels
//! - [`task`]: Task lifecycle, type approval, completion, extensions, and
//!   the procurement stage pipeline
//! - [`error`]: Transport-facing error classification

pub mod activity;
pub mod error;
pub mod identity;
pub mod task;
pub mod team;
