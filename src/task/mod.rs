//! Tasks: the unit of governed work.
//!
//! The lifecycle controller owns creation, visibility, approval, status
//! moves, assignment, due dates, and deletion. Three satellite state
//! machines attach to a task: the type-approval gate for Technical and
//! Procurement work, the proof-backed completion workflow, and the
//! due-date extension workflow. Procurement tasks additionally carry an
//! ordered stage pipeline.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
