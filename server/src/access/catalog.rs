//! Service catalog.
//!
//! Authoritative, read-only set of services and their categories for one
//! snapshot. Pure storage/query; no permission logic lives here.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::Range;

use sg_types::{Category, CategoryId, Service, ServiceId};

use super::error::CatalogError;

/// Path of a category that has no services yet.
pub const ROOT_PATH: &str = "/";

/// Indexed catalog of categories and services.
///
/// Categories are ordered by `(position, name)`; services by their category's
/// order, then `(display_order, name)`. Services of one category are therefore
/// contiguous, which lets [`Catalog::services_in`] hand out plain slices.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    services: Vec<Service>,
    /// Parallel to `categories`: each category's slice of `services`.
    spans: Vec<Range<usize>>,
    category_index: HashMap<CategoryId, usize>,
    service_index: HashMap<ServiceId, usize>,
    by_name: HashMap<String, usize>,
    by_path: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, validating name uniqueness and category references.
    pub fn new(
        mut categories: Vec<Category>,
        mut services: Vec<Service>,
    ) -> Result<Self, CatalogError> {
        categories.sort_by(|a, b| (a.position, &a.name).cmp(&(b.position, &b.name)));

        let mut category_index = HashMap::with_capacity(categories.len());
        let mut category_names = HashMap::with_capacity(categories.len());
        for (idx, category) in categories.iter().enumerate() {
            if category_names.insert(category.name.as_str(), idx).is_some() {
                return Err(CatalogError::DuplicateCategoryName(category.name.clone()));
            }
            category_index.insert(category.id, idx);
        }

        for service in &services {
            if !category_index.contains_key(&service.category_id) {
                return Err(CatalogError::UnknownCategory {
                    service: service.name.clone(),
                    category_id: service.category_id,
                });
            }
        }

        // Every category_id was checked above.
        services.sort_by(|a, b| {
            let rank_a = category_index[&a.category_id];
            let rank_b = category_index[&b.category_id];
            (rank_a, a.display_order, &a.name).cmp(&(rank_b, b.display_order, &b.name))
        });

        let mut service_index = HashMap::with_capacity(services.len());
        let mut by_name = HashMap::with_capacity(services.len());
        let mut by_path = HashMap::with_capacity(services.len());
        for (idx, service) in services.iter().enumerate() {
            match by_name.entry(service.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(CatalogError::DuplicateServiceName(service.name.clone()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
            }
            service_index.insert(service.id, idx);
            // Shared paths resolve to the first service in catalog order.
            by_path.entry(service.path.clone()).or_insert(idx);
        }

        let mut spans = Vec::with_capacity(categories.len());
        let mut start = 0;
        for rank in 0..categories.len() {
            let len = services[start..]
                .iter()
                .take_while(|s| category_index[&s.category_id] == rank)
                .count();
            spans.push(start..start + len);
            start += len;
        }

        Ok(Self {
            categories,
            services,
            spans,
            category_index,
            service_index,
            by_name,
            by_path,
        })
    }

    /// Look up a service by its unique name.
    pub fn find_by_name(&self, name: &str) -> Option<&Service> {
        self.by_name.get(name).map(|&idx| &self.services[idx])
    }

    /// Look up a service by exact path. No prefix or wildcard matching.
    pub fn find_by_path(&self, path: &str) -> Option<&Service> {
        self.by_path.get(path).map(|&idx| &self.services[idx])
    }

    pub fn find_by_id(&self, id: ServiceId) -> Option<&Service> {
        self.service_index.get(&id).map(|&idx| &self.services[idx])
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.category_index.get(&id).map(|&idx| &self.categories[idx])
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All services in catalog order.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Services of one category in display order; empty for an unknown id.
    pub fn services_in(&self, category_id: CategoryId) -> &[Service] {
        match self.category_index.get(&category_id) {
            Some(&idx) => &self.services[self.spans[idx].clone()],
            None => &[],
        }
    }

    /// Every category paired with its ordered services.
    pub fn list_by_category(&self) -> Vec<(&Category, &[Service])> {
        self.categories
            .iter()
            .zip(&self.spans)
            .map(|(category, span)| (category, &self.services[span.clone()]))
            .collect()
    }

    /// Landing path of a category: the path of its first service, or `/`.
    pub fn category_path(&self, category_id: CategoryId) -> &str {
        self.services_in(category_id)
            .first()
            .map_or(ROOT_PATH, |s| s.path.as_str())
    }

    /// `"<category>/<service>"`, as shown on admin screens.
    pub fn qualified_name(&self, service: &Service) -> String {
        match self.category(service.category_id) {
            Some(category) => format!("{}/{}", category.name, service.name),
            None => service.name.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
