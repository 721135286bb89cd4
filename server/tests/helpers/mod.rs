//! Reusable fixtures for access-control integration tests.
//!
//! [`SiteBuilder`] assembles categories, services and overrides into an
//! [`AccessSnapshot`] without touching the database.
#![allow(dead_code)]

use sg_server::access::AccessSnapshot;
use sg_types::{
    Category, CategoryId, GroupId, GroupServicePermission, PermissionLevel, Principal, Service,
    ServiceId,
};

/// Every level from lowest to highest.
pub const LEVELS: [PermissionLevel; 7] = [
    PermissionLevel::None,
    PermissionLevel::Access,
    PermissionLevel::Read,
    PermissionLevel::Comment,
    PermissionLevel::Write,
    PermissionLevel::Edit,
    PermissionLevel::Delete,
];

#[derive(Debug, Default)]
pub struct SiteBuilder {
    categories: Vec<Category>,
    services: Vec<Service>,
    overrides: Vec<GroupServicePermission>,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&mut self, name: &str, position: i32) -> CategoryId {
        let category = Category::new(name, position);
        let id = category.id;
        self.categories.push(category);
        id
    }

    /// Add an open service with the given ceilings.
    pub fn service(
        &mut self,
        category_id: CategoryId,
        name: &str,
        anonymous: PermissionLevel,
        authenticated: PermissionLevel,
    ) -> ServiceId {
        let path = format!("/{}", name.to_lowercase());
        self.push_service(
            Service::new(category_id, name, path).with_ceilings(anonymous, authenticated),
        )
    }

    pub fn push_service(&mut self, service: Service) -> ServiceId {
        let id = service.id;
        self.services.push(service);
        id
    }

    pub fn grant(&mut self, group_id: GroupId, service_id: ServiceId, level: PermissionLevel) {
        self.overrides
            .push(GroupServicePermission::new(group_id, service_id, level));
    }

    pub fn build(self) -> AccessSnapshot {
        AccessSnapshot::build(self.categories, self.services, self.overrides)
            .expect("Fixture snapshot should be consistent")
    }
}

/// Resolve a service by ID against a snapshot.
pub fn resolve(
    snapshot: &AccessSnapshot,
    principal: &Principal,
    service_id: ServiceId,
) -> PermissionLevel {
    let service = snapshot
        .catalog()
        .find_by_id(service_id)
        .expect("Service should exist in fixture");
    snapshot.resolver().resolve(principal, service)
}

/// A representative set of principals with and without the given groups.
pub fn principals(groups: &[GroupId]) -> Vec<Principal> {
    let mut all = vec![
        Principal::anonymous(),
        Principal::authenticated([]),
        Principal::authenticated(groups.iter().copied()),
    ];
    all.extend(
        groups
            .iter()
            .map(|group| Principal::authenticated([*group])),
    );
    all
}
