//! Database models and admin input types for the service catalog.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sg_types::{Category, GroupServicePermission, PermissionLevel, Service};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ============================================================================
// Rows
// ============================================================================

/// Category record.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub visible_in_navigation: bool,
    pub position: i32,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            visible_in_navigation: row.visible_in_navigation,
            position: row.position,
        }
    }
}

/// Service record.
///
/// Permission columns decode through `PermissionLevel::try_from`, so an
/// out-of-range stored value fails the query instead of being clamped.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub path: String,
    pub display_order: i32,
    pub description: String,
    pub is_closed: bool,
    #[sqlx(try_from = "i32")]
    pub max_permission_anonymous: PermissionLevel,
    #[sqlx(try_from = "i32")]
    pub max_permission_authenticated: PermissionLevel,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            category_id: row.category_id.into(),
            path: row.path,
            display_order: row.display_order,
            description: row.description,
            is_closed: row.is_closed,
            max_permission_anonymous: row.max_permission_anonymous,
            max_permission_authenticated: row.max_permission_authenticated,
        }
    }
}

/// Group override record.
#[derive(Debug, Clone, FromRow)]
pub struct GroupServicePermissionRow {
    pub group_id: Uuid,
    pub service_id: Uuid,
    #[sqlx(try_from = "i32")]
    pub permission: PermissionLevel,
}

impl From<GroupServicePermissionRow> for GroupServicePermission {
    fn from(row: GroupServicePermissionRow) -> Self {
        Self::new(row.group_id.into(), row.service_id.into(), row.permission)
    }
}

/// Group mirrored from the identity provider.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupRow {
    pub id: Uuid,
    pub name: String,
}

// ============================================================================
// Admin input
// ============================================================================

/// Service paths: leading slash, then letters, digits, `_`, `-`, `/`.
static SERVICE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[A-Za-z0-9_\-/]*$").expect("valid service path regex"));

fn validate_service_path(path: &str) -> Result<(), ValidationError> {
    if SERVICE_PATH_REGEX.is_match(path) {
        Ok(())
    } else {
        Err(ValidationError::new("service_path")
            .with_message("Path must look like /aaa/bbb".into()))
    }
}

const fn default_true() -> bool {
    true
}

const fn default_display_order() -> i32 {
    1
}

const fn default_authenticated_level() -> PermissionLevel {
    PermissionLevel::Read
}

fn default_path() -> String {
    "/".to_string()
}

/// Create category request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[serde(default = "default_true")]
    pub visible_in_navigation: bool,
    #[serde(default)]
    pub position: i32,
}

/// Create service request. Omitted fields take the catalog defaults.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewService {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    pub category_id: Uuid,
    #[serde(default = "default_path")]
    #[validate(length(min = 1, max = 32), custom(function = "validate_service_path"))]
    pub path: String,
    #[serde(default = "default_display_order")]
    pub display_order: i32,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub max_permission_anonymous: PermissionLevel,
    #[serde(default = "default_authenticated_level")]
    pub max_permission_authenticated: PermissionLevel,
}

/// Partial update of a service's access configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceAccessUpdate {
    pub is_closed: Option<bool>,
    pub max_permission_anonymous: Option<PermissionLevel>,
    pub max_permission_authenticated: Option<PermissionLevel>,
}
