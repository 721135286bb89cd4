//! Catalog records: categories, services, and group overrides.
//!
//! These are plain snapshots of administrator-managed data. Nothing in the
//! access-control core mutates them.

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, GroupId, ServiceId};
use crate::permission::PermissionLevel;

/// Named grouping of services; the top level of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Shown in the site navigator.
    pub visible_in_navigation: bool,
    /// Display order among categories.
    pub position: i32,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>, position: i32) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            visible_in_navigation: true,
            position,
        }
    }
}

/// Independently permissioned unit of site functionality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub category_id: CategoryId,
    /// Path without domain, e.g. `/board/notice`. Used by the routing layer.
    pub path: String,
    /// Ordering among services of the same category.
    pub display_order: i32,
    #[serde(default)]
    pub description: String,
    /// Only superusers may access a closed service.
    pub is_closed: bool,
    /// Ceiling for principals who are not logged in.
    pub max_permission_anonymous: PermissionLevel,
    /// Ceiling for any logged-in principal.
    pub max_permission_authenticated: PermissionLevel,
}

impl Service {
    /// New open service with the default ceilings (`none` anonymous, `read`
    /// authenticated) and display order 1.
    #[must_use]
    pub fn new(category_id: CategoryId, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: ServiceId::new(),
            name: name.into(),
            category_id,
            path: path.into(),
            display_order: 1,
            description: String::new(),
            is_closed: false,
            max_permission_anonymous: PermissionLevel::None,
            max_permission_authenticated: PermissionLevel::Read,
        }
    }

    #[must_use]
    pub fn with_ceilings(
        mut self,
        anonymous: PermissionLevel,
        authenticated: PermissionLevel,
    ) -> Self {
        self.max_permission_anonymous = anonymous;
        self.max_permission_authenticated = authenticated;
        self
    }

    #[must_use]
    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    #[must_use]
    pub fn closed(mut self) -> Self {
        self.is_closed = true;
        self
    }
}

/// Members of `group_id` may use `service_id` up to `permission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupServicePermission {
    pub group_id: GroupId,
    pub service_id: ServiceId,
    pub permission: PermissionLevel,
}

impl GroupServicePermission {
    #[must_use]
    pub const fn new(group_id: GroupId, service_id: ServiceId, permission: PermissionLevel) -> Self {
        Self {
            group_id,
            service_id,
            permission,
        }
    }
}
