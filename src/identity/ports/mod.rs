//! Port contracts for the identity module.

mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
