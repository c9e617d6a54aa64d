//! Port contracts for the team module.

mod repository;

pub use repository::{TeamRepository, TeamRepositoryError, TeamRepositoryResult};
