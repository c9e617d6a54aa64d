//! Effective privilege computation across the global and team role axes.

use super::TeamRole;
use crate::identity::domain::GlobalRole;

/// A user's effective privileges with respect to one team.
///
/// Pure value computed from the global role and the (optional) team-scoped
/// membership role. All authorisation gates in the engine reduce to the
/// predicates on this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRole {
    global: GlobalRole,
    team_role: Option<TeamRole>,
}

impl EffectiveRole {
    /// Combines a global role with an optional team membership role.
    #[must_use]
    pub const fn new(global: GlobalRole, team_role: Option<TeamRole>) -> Self {
        Self { global, team_role }
    }

    /// Returns the global role.
    #[must_use]
    pub const fn global(&self) -> GlobalRole {
        self.global
    }

    /// Returns the team-scoped role, absent when the user is not a member.
    #[must_use]
    pub const fn team_role(&self) -> Option<TeamRole> {
        self.team_role
    }

    /// Global administrators bypass every team-scoped membership check.
    #[must_use]
    pub const fn is_global_admin(&self) -> bool {
        self.global.is_global_admin()
    }

    /// Returns true when the user holds a membership in the team.
    ///
    /// Global administrators are treated as members of every team for read
    /// and mutation purposes.
    #[must_use]
    pub const fn is_team_member(&self) -> bool {
        self.is_global_admin() || self.team_role.is_some()
    }

    /// Team Admin is a team-scoped role, narrower than privileged: it gates
    /// completion/extension decisions, due-date changes, deletions, and
    /// member removal.
    #[must_use]
    pub const fn is_team_admin(&self) -> bool {
        matches!(self.team_role, Some(TeamRole::Admin))
    }

    /// Global or team admin: the tier deciding completion and extension
    /// requests, changing due dates, and deleting tasks or activities.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_global_admin() || self.is_team_admin()
    }

    /// Privileged tier: may set assignees at creation, create multi-assignee
    /// tasks, and create Technical/Procurement tasks without type approval.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        if self.is_global_admin() {
            return true;
        }
        if matches!(
            self.global,
            GlobalRole::GroupHead | GlobalRole::TeamLead | GlobalRole::ProjectDirector
        ) {
            return true;
        }
        match self.team_role {
            Some(role) => role.is_privileged(),
            None => false,
        }
    }

    /// Type-approver tier: decides Technical/Procurement type approval.
    /// Deliberately excludes Group Head on both axes.
    #[must_use]
    pub const fn can_approve_type(&self) -> bool {
        if self.is_global_admin() {
            return true;
        }
        if matches!(self.global, GlobalRole::TeamLead | GlobalRole::ProjectDirector) {
            return true;
        }
        matches!(
            self.team_role,
            Some(TeamRole::TeamLead | TeamRole::ProjectDirector)
        )
    }

    /// Post-creation reassignment is reserved to global administrators;
    /// team admins and Team Leads cannot reassign.
    #[must_use]
    pub const fn can_reassign(&self) -> bool {
        self.is_global_admin()
    }

    /// Task approval (`is_approved` false to true) is open to every global
    /// role except member.
    #[must_use]
    pub const fn can_approve_task(&self) -> bool {
        !matches!(self.global, GlobalRole::Member)
    }

    /// May remove members: global admin, team admin, or a privileged
    /// team-scoped role.
    #[must_use]
    pub const fn can_remove_members(&self) -> bool {
        if self.is_admin() {
            return true;
        }
        match self.team_role {
            Some(role) => role.is_privileged(),
            None => false,
        }
    }
}
