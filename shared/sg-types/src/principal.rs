//! The acting identity being evaluated for access.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ids::GroupId;

/// Snapshot of an identity as supplied by the identity provider.
///
/// The resolver reads only these three fields; it never looks at a richer
/// user object or at ambient request state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub is_superuser: bool,
    pub is_authenticated: bool,
    #[serde(default)]
    pub group_ids: HashSet<GroupId>,
}

impl Principal {
    /// Not logged in. Anonymous principals carry no groups.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Logged-in user with the given group memberships.
    #[must_use]
    pub fn authenticated(group_ids: impl IntoIterator<Item = GroupId>) -> Self {
        Self {
            is_superuser: false,
            is_authenticated: true,
            group_ids: group_ids.into_iter().collect(),
        }
    }

    /// Site administrator. Always authenticated.
    #[must_use]
    pub fn superuser() -> Self {
        Self {
            is_superuser: true,
            is_authenticated: true,
            group_ids: HashSet::new(),
        }
    }

    /// Add a group membership.
    #[must_use]
    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_ids.insert(group_id);
        self
    }

    /// Whether the principal belongs to `group_id`.
    #[must_use]
    pub fn is_member_of(&self, group_id: GroupId) -> bool {
        self.group_ids.contains(&group_id)
    }
}
