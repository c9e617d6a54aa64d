//! Domain model for user identity and global roles.
//!
//! The engine never sees credentials; these types describe the authenticated
//! record the identity provider supplies with every request.

mod error;
mod ids;
mod role;
mod user;

pub use error::{IdentityDomainError, ParseGlobalRoleError};
pub use ids::UserId;
pub use role::GlobalRole;
pub use user::{User, Username};
