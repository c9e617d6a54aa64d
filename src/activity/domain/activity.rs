//! Activity aggregate: a Division or Project owned by a team.

use super::{ActivityDomainError, ActivityId, ParseActivityKindError};
use crate::team::domain::TeamId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    /// A standing division.
    Division,
    /// A time-bound project.
    Project,
}

impl ActivityKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Division => "Division",
            Self::Project => "Project",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ActivityKind {
    type Error = ParseActivityKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Division" => Ok(Self::Division),
            "Project" => Ok(Self::Project),
            other => Err(ParseActivityKindError(other.to_owned())),
        }
    }
}

/// Validated activity name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityName(String);

impl ActivityName {
    /// Creates a validated activity name.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::EmptyActivityName`] when the trimmed
    /// value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ActivityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(ActivityDomainError::EmptyActivityName);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Activity aggregate root. Belongs to exactly one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    name: ActivityName,
    kind: ActivityKind,
    team_id: TeamId,
    created_at: DateTime<Utc>,
}

impl Activity {
    /// Creates a new activity under a team.
    #[must_use]
    pub fn new(name: ActivityName, kind: ActivityKind, team_id: TeamId, clock: &impl Clock) -> Self {
        Self {
            id: ActivityId::new(),
            name,
            kind,
            team_id,
            created_at: clock.utc(),
        }
    }

    /// Returns the activity identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the activity name.
    #[must_use]
    pub const fn name(&self) -> &ActivityName {
        &self.name
    }

    /// Returns the activity kind.
    #[must_use]
    pub const fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
