//! Service permission levels.
//!
//! Seven totally ordered grades. A principal holding a level implicitly holds
//! every lower level, so "does A satisfy B" is simply `A >= B`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access grade for a service, ordered from `None` (lowest) to `Delete`.
///
/// Stored as an INTEGER rank (0..=6) in PostgreSQL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PermissionLevel {
    /// No permission
    #[default]
    None = 0,
    /// Can access (see the service in navigation, open it)
    Access = 1,
    /// Can read
    Read = 2,
    /// Can comment
    Comment = 3,
    /// Can write
    Write = 4,
    /// Can edit
    Edit = 5,
    /// Can delete
    Delete = 6,
}

/// Error raised when a stored or supplied value is not one of the seven grades.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPermissionLevel {
    #[error("invalid permission level: {0} is outside 0..=6")]
    OutOfRange(i64),

    #[error("invalid permission level: {0:?}")]
    UnknownName(String),
}

impl PermissionLevel {
    /// Highest grade; what a superuser holds on every service.
    pub const MAX: Self = Self::Delete;

    /// Returns all levels from lowest to highest.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::Access,
            Self::Read,
            Self::Comment,
            Self::Write,
            Self::Edit,
            Self::Delete,
        ]
    }

    /// Numeric rank used for storage and comparison.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Build a level from a raw stored value.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub const fn from_raw(value: i64) -> Result<Self, InvalidPermissionLevel> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Access),
            2 => Ok(Self::Read),
            3 => Ok(Self::Comment),
            4 => Ok(Self::Write),
            5 => Ok(Self::Edit),
            6 => Ok(Self::Delete),
            other => Err(InvalidPermissionLevel::OutOfRange(other)),
        }
    }

    /// Whether holding `self` satisfies a requirement of `required`.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }

    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Access => "access",
            Self::Read => "read",
            Self::Comment => "comment",
            Self::Write => "write",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Human-readable label for admin screens and templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No permission",
            Self::Access => "Can access",
            Self::Read => "Can read",
            Self::Comment => "Can comment",
            Self::Write => "Can write",
            Self::Edit => "Can edit",
            Self::Delete => "Can delete",
        }
    }
}

impl TryFrom<i32> for PermissionLevel {
    type Error = InvalidPermissionLevel;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_raw(i64::from(value))
    }
}

impl TryFrom<i64> for PermissionLevel {
    type Error = InvalidPermissionLevel;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl From<PermissionLevel> for i32 {
    fn from(level: PermissionLevel) -> Self {
        Self::from(level.rank())
    }
}

impl FromStr for PermissionLevel {
    type Err = InvalidPermissionLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| InvalidPermissionLevel::UnknownName(s.to_string()))
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
