//! Request guard for the routing layer.
//!
//! Combines catalog lookup with a permission check in a single call. The
//! guard returns plain outcomes; turning them into "not found" or "forbidden"
//! responses is the caller's job.

use sg_types::{PermissionLevel, Principal, Service};

use super::error::AccessError;
use super::snapshot::AccessSnapshot;

/// Normalise a routed path to the stored form by prefixing `/` when missing.
///
/// Only the leading slash is touched; matching stays exact.
pub fn normalize_path(raw: &str) -> String {
    if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    }
}

/// Locate a service by routed path and require `required` on it.
pub fn authorize_path<'s>(
    snapshot: &'s AccessSnapshot,
    principal: &Principal,
    path: &str,
    required: PermissionLevel,
) -> Result<&'s Service, AccessError> {
    let path = normalize_path(path);
    let service = snapshot
        .catalog()
        .find_by_path(&path)
        .ok_or(AccessError::ServiceNotFound { lookup: path })?;

    check(snapshot, principal, service, required)
}

/// Locate a service by name and require `required` on it.
pub fn authorize_name<'s>(
    snapshot: &'s AccessSnapshot,
    principal: &Principal,
    name: &str,
    required: PermissionLevel,
) -> Result<&'s Service, AccessError> {
    let service = snapshot
        .catalog()
        .find_by_name(name)
        .ok_or_else(|| AccessError::ServiceNotFound {
            lookup: name.to_string(),
        })?;

    check(snapshot, principal, service, required)
}

fn check<'s>(
    snapshot: &'s AccessSnapshot,
    principal: &Principal,
    service: &'s Service,
    required: PermissionLevel,
) -> Result<&'s Service, AccessError> {
    let held = snapshot.resolver().resolve(principal, service);
    if held.satisfies(required) {
        return Ok(service);
    }

    tracing::debug!(
        service = %service.name,
        %required,
        %held,
        "service access denied"
    );
    Err(AccessError::Forbidden {
        service: snapshot.catalog().qualified_name(service),
        required,
        held,
    })
}
