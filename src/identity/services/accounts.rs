//! Service layer for the user directory.

use crate::error::ErrorKind;
use crate::identity::{
    domain::{GlobalRole, IdentityDomainError, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The username is already taken.
    #[error("username already taken: {0}")]
    UsernameTaken(Username),

    /// The acting user may not manage accounts.
    #[error("only global administrators can change user roles")]
    RoleChangeRestricted,

    /// The requested role cannot be granted through role management.
    #[error("role '{0}' cannot be assigned")]
    UnassignableRole(GlobalRole),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(UserRepositoryError),
}

impl AccountServiceError {
    /// Maps the error onto the transport taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::UnassignableRole(_) => ErrorKind::InvalidArgument,
            Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::UsernameTaken(_) => ErrorKind::Conflict,
            Self::RoleChangeRestricted => ErrorKind::Forbidden,
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

impl From<UserRepositoryError> for AccountServiceError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateUsername(username) => Self::UsernameTaken(username),
            UserRepositoryError::NotFound(id) => Self::UserNotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for account service operations.
pub type AccountServiceResult<T> = Result<T, AccountServiceError>;

/// User directory orchestration service.
///
/// Registration carries no credential: authentication is handled by the
/// external identity provider and is out of scope for the engine.
#[derive(Clone)]
pub struct AccountService<R>
where
    R: UserRepository,
{
    users: Arc<R>,
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(users: Arc<R>) -> Self {
        Self { users }
    }

    /// Registers a new user record.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UsernameTaken`] on a username
    /// collision and [`AccountServiceError::Domain`] when the username fails
    /// validation.
    pub async fn register(
        &self,
        username: impl Into<String> + Send,
        global_role: GlobalRole,
    ) -> AccountServiceResult<User> {
        let username = Username::new(username)?;
        let user = User::new(username, global_role);
        self.users.store(&user).await?;
        Ok(user)
    }

    /// Changes a user's global role.
    ///
    /// Only global administrators may change roles, and only the roles
    /// manageable through administration (admin, division head, member) can
    /// be granted.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::RoleChangeRestricted`] when the actor
    /// is not a global administrator, [`AccountServiceError::UserNotFound`]
    /// when the target is absent, and
    /// [`AccountServiceError::UnassignableRole`] for roles outside the
    /// manageable set.
    pub async fn change_global_role(
        &self,
        actor: &User,
        target: UserId,
        role: GlobalRole,
    ) -> AccountServiceResult<User> {
        if !actor.global_role().is_global_admin() {
            return Err(AccountServiceError::RoleChangeRestricted);
        }
        if !matches!(
            role,
            GlobalRole::Admin | GlobalRole::DivisionHead | GlobalRole::Member
        ) {
            return Err(AccountServiceError::UnassignableRole(role));
        }
        let mut user = self
            .users
            .find_by_id(target)
            .await?
            .ok_or(AccountServiceError::UserNotFound(target))?;
        user.set_global_role(role);
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Finds a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] when absent.
    pub async fn find(&self, id: UserId) -> AccountServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AccountServiceError::UserNotFound(id))
    }

    /// Lists every user ordered by username.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Repository`] when the lookup fails.
    pub async fn list(&self) -> AccountServiceResult<Vec<User>> {
        Ok(self.users.list().await?)
    }
}
