//! Orchestration services for the identity module.

mod accounts;

pub use accounts::{AccountService, AccountServiceError, AccountServiceResult};
