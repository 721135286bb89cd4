//! Permission resolution logic.
//!
//! Computes the effective permission level of a principal on a service.

use sg_types::{PermissionLevel, Principal, Service};

use super::error::AccessError;
use super::overrides::{GroupGrants, OverrideTable};

/// Compute the level a principal holds on a service.
///
/// Resolution order:
/// 1. Superusers hold `Delete` everywhere, closed services included
/// 2. Closed services grant nothing to anyone else
/// 3. Otherwise the maximum of the anonymous ceiling, the authenticated
///    ceiling (logged-in principals only), and the best group grant
///
/// Grants below step 2 are only ever combined with `max`; more affiliations
/// can never lower the result.
pub fn compute_service_permission(
    principal: &Principal,
    service: &Service,
    group_grant: PermissionLevel,
) -> PermissionLevel {
    if principal.is_superuser {
        return PermissionLevel::MAX;
    }

    if service.is_closed {
        return PermissionLevel::None;
    }

    // Anonymous ceiling is a floor everyone gets
    let mut level = service.max_permission_anonymous;

    if principal.is_authenticated {
        level = level.max(service.max_permission_authenticated);
    }

    level.max(group_grant)
}

/// Resolver bound to the override table of one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    overrides: &'a OverrideTable,
}

impl<'a> Resolver<'a> {
    pub const fn new(overrides: &'a OverrideTable) -> Self {
        Self { overrides }
    }

    /// Maximum level the principal legitimately holds on `service`.
    pub fn resolve(&self, principal: &Principal, service: &Service) -> PermissionLevel {
        let group_grant = if principal.is_superuser || service.is_closed {
            PermissionLevel::None
        } else {
            self.overrides.max_grant(service.id, &principal.group_ids)
        };

        let level = compute_service_permission(principal, service, group_grant);
        tracing::trace!(service = %service.name, %level, "resolved service permission");
        level
    }

    /// Whether the principal holds at least `required` on `service`.
    pub fn is_permitted(
        &self,
        principal: &Principal,
        service: &Service,
        required: PermissionLevel,
    ) -> bool {
        self.resolve(principal, service).satisfies(required)
    }

    /// Whether the principal may access `service` at all.
    pub fn can_access(&self, principal: &Principal, service: &Service) -> bool {
        self.is_permitted(principal, service, PermissionLevel::Access)
    }

    /// Require `required` on `service`, returning the held level on success.
    pub fn require(
        &self,
        principal: &Principal,
        service: &Service,
        required: PermissionLevel,
    ) -> Result<PermissionLevel, AccessError> {
        let held = self.resolve(principal, service);
        if held.satisfies(required) {
            Ok(held)
        } else {
            Err(AccessError::Forbidden {
                service: service.name.clone(),
                required,
                held,
            })
        }
    }

    /// Resolver with the principal's group grants loaded once up front.
    ///
    /// Use for batch checks over many services.
    pub fn for_principal<'p>(&self, principal: &'p Principal) -> PrincipalResolver<'p> {
        let grants = if principal.is_superuser {
            GroupGrants::default()
        } else {
            self.overrides.grants_for(&principal.group_ids)
        };

        PrincipalResolver { principal, grants }
    }
}

/// Pre-computed permission context for one principal.
///
/// Contains everything needed to resolve any service of the snapshot without
/// touching the override table again.
#[derive(Debug, Clone)]
pub struct PrincipalResolver<'p> {
    principal: &'p Principal,
    grants: GroupGrants,
}

impl PrincipalResolver<'_> {
    pub const fn principal(&self) -> &Principal {
        self.principal
    }

    pub fn resolve(&self, service: &Service) -> PermissionLevel {
        compute_service_permission(self.principal, service, self.grants.get(service.id))
    }

    pub fn is_permitted(&self, service: &Service, required: PermissionLevel) -> bool {
        self.resolve(service).satisfies(required)
    }
}
