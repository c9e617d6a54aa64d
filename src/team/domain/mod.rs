//! Domain model for teams, memberships, and role resolution.
//!
//! Teams own activities and tasks; memberships carry the team-scoped role
//! axis; [`EffectiveRole`] folds both axes into the privilege predicates the
//! rest of the engine gates on.

mod access;
mod error;
mod ids;
mod invitation;
mod membership;
mod role;
mod team;

pub use access::EffectiveRole;
pub use error::{ParseTeamRoleError, ParseTeamStatusError, TeamDomainError};
pub use ids::{InvitationId, TeamId};
pub use invitation::{InvitationStatus, TeamInvitation};
pub use membership::TeamMembership;
pub use role::TeamRole;
pub use team::{Team, TeamName, TeamStatus};
