//! Accessible-set query.
//!
//! Filters the catalog listing through the resolver, keeping catalog order.
//! Group grants are loaded once per query, not once per service.

use sg_types::{Category, CategoryId, PermissionLevel, Principal, Service};

use super::catalog::Catalog;
use super::overrides::OverrideTable;
use super::resolver::Resolver;

/// Bulk variant of the resolver over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AccessibleSetQuery<'a> {
    catalog: &'a Catalog,
    overrides: &'a OverrideTable,
}

impl<'a> AccessibleSetQuery<'a> {
    pub const fn new(catalog: &'a Catalog, overrides: &'a OverrideTable) -> Self {
        Self { catalog, overrides }
    }

    /// Services the principal may access, in catalog order.
    ///
    /// `category` narrows the result to one category; an unknown category
    /// yields an empty list.
    pub fn for_principal(
        &self,
        principal: &Principal,
        category: Option<CategoryId>,
    ) -> Vec<&'a Service> {
        self.at_least(principal, category, PermissionLevel::Access)
    }

    /// Services where the principal holds at least `threshold`.
    pub fn at_least(
        &self,
        principal: &Principal,
        category: Option<CategoryId>,
        threshold: PermissionLevel,
    ) -> Vec<&'a Service> {
        let candidates = match category {
            Some(id) => self.catalog.services_in(id),
            None => self.catalog.services(),
        };

        let resolver = Resolver::new(self.overrides).for_principal(principal);
        candidates
            .iter()
            .filter(|service| resolver.is_permitted(service, threshold))
            .collect()
    }

    /// Every category paired with the services the principal may access.
    ///
    /// Categories without accessible services are kept with an empty list.
    pub fn by_category(&self, principal: &Principal) -> Vec<(&'a Category, Vec<&'a Service>)> {
        let resolver = Resolver::new(self.overrides).for_principal(principal);
        self.catalog
            .list_by_category()
            .into_iter()
            .map(|(category, services)| {
                let accessible = services
                    .iter()
                    .filter(|service| resolver.is_permitted(service, PermissionLevel::Access))
                    .collect();
                (category, accessible)
            })
            .collect()
    }
}
