//! Access-control error types.

use sg_types::{CategoryId, GroupId, PermissionLevel, ServiceId};
use thiserror::Error;

/// Integrity violations found while indexing a catalog snapshot.
///
/// These indicate corrupted or misconfigured data and are surfaced to the
/// operator; they are never interpreted as "deny".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate service name: {0}")]
    DuplicateServiceName(String),

    #[error("Duplicate category name: {0}")]
    DuplicateCategoryName(String),

    #[error("Service {service} references unknown category {category_id}")]
    UnknownCategory {
        service: String,
        category_id: CategoryId,
    },

    #[error("Override references unknown service {0}")]
    UnknownService(ServiceId),

    #[error("Duplicate override for group {group_id} on service {service_id}")]
    DuplicateOverride {
        group_id: GroupId,
        service_id: ServiceId,
    },
}

/// Outcome of a failed guard check.
///
/// The routing layer maps `ServiceNotFound` to "not found" and `Forbidden`
/// to "forbidden".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Service not found: {lookup}")]
    ServiceNotFound { lookup: String },

    #[error("Permission {required} required on {service} (held: {held})")]
    Forbidden {
        service: String,
        required: PermissionLevel,
        held: PermissionLevel,
    },
}

impl AccessError {
    /// Whether the failure is an absent service rather than a denial.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ServiceNotFound { .. })
    }
}
