//! Application services for the team module.

mod access;
mod membership;

pub use access::{RoleResolver, RoleResolutionError};
pub use membership::{TeamService, TeamServiceError};
