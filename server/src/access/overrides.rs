//! Group override table.
//!
//! Sparse per-group grants layered on top of service defaults. Indexed both
//! by service (single checks) and by group (bulk per-principal lookups), so
//! neither path scans groups × overrides.

use std::collections::{HashMap, HashSet};

use sg_types::{GroupId, GroupServicePermission, PermissionLevel, ServiceId};

use super::error::CatalogError;

/// All group overrides of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    by_service: HashMap<ServiceId, Vec<(GroupId, PermissionLevel)>>,
    by_group: HashMap<GroupId, Vec<(ServiceId, PermissionLevel)>>,
    len: usize,
}

impl OverrideTable {
    /// Index override rows. A `(group, service)` pair may appear only once.
    pub fn new(
        rows: impl IntoIterator<Item = GroupServicePermission>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut table = Self::default();

        for row in rows {
            if !seen.insert((row.group_id, row.service_id)) {
                return Err(CatalogError::DuplicateOverride {
                    group_id: row.group_id,
                    service_id: row.service_id,
                });
            }
            table
                .by_service
                .entry(row.service_id)
                .or_default()
                .push((row.group_id, row.permission));
            table
                .by_group
                .entry(row.group_id)
                .or_default()
                .push((row.service_id, row.permission));
            table.len += 1;
        }

        Ok(table)
    }

    /// Highest level any of `groups` is granted on `service_id`, or `None`.
    pub fn max_grant(&self, service_id: ServiceId, groups: &HashSet<GroupId>) -> PermissionLevel {
        if groups.is_empty() {
            return PermissionLevel::None;
        }

        self.for_service(service_id)
            .iter()
            .filter(|(group_id, _)| groups.contains(group_id))
            .map(|&(_, level)| level)
            .max()
            .unwrap_or(PermissionLevel::None)
    }

    /// Pre-compute every service grant for one principal's groups.
    ///
    /// Walks only the overrides of the given groups; use this when resolving
    /// many services for the same principal.
    pub fn grants_for(&self, groups: &HashSet<GroupId>) -> GroupGrants {
        let mut grants: HashMap<ServiceId, PermissionLevel> = HashMap::new();

        for group_id in groups {
            let Some(entries) = self.by_group.get(group_id) else {
                continue;
            };
            for &(service_id, level) in entries {
                let slot = grants.entry(service_id).or_insert(PermissionLevel::None);
                *slot = (*slot).max(level);
            }
        }

        GroupGrants(grants)
    }

    /// Overrides registered for one service.
    pub fn for_service(&self, service_id: ServiceId) -> &[(GroupId, PermissionLevel)] {
        self.by_service.get(&service_id).map_or(&[][..], Vec::as_slice)
    }

    /// Service ids that have at least one override.
    pub fn services(&self) -> impl Iterator<Item = ServiceId> + '_ {
        self.by_service.keys().copied()
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Per-principal group grants, keyed by service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupGrants(HashMap<ServiceId, PermissionLevel>);

impl GroupGrants {
    /// Grant on `service_id`, `None` when no group of the principal has one.
    pub fn get(&self, service_id: ServiceId) -> PermissionLevel {
        self.0
            .get(&service_id)
            .copied()
            .unwrap_or(PermissionLevel::None)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
