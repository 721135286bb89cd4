//! Consistent read snapshot of the catalog and override table.

use sg_types::{Category, GroupServicePermission, Service};

use super::accessible::AccessibleSetQuery;
use super::catalog::Catalog;
use super::error::CatalogError;
use super::overrides::OverrideTable;
use super::resolver::Resolver;

/// Immutable view of all access-control data at one point in time.
///
/// Every resolution against a snapshot sees the same catalog and overrides;
/// publishing new data means building a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct AccessSnapshot {
    catalog: Catalog,
    overrides: OverrideTable,
}

impl AccessSnapshot {
    /// Index raw records, validating every cross-reference.
    pub fn build(
        categories: Vec<Category>,
        services: Vec<Service>,
        overrides: Vec<GroupServicePermission>,
    ) -> Result<Self, CatalogError> {
        let catalog = Catalog::new(categories, services)?;

        if let Some(orphan) = overrides
            .iter()
            .find(|o| catalog.find_by_id(o.service_id).is_none())
        {
            return Err(CatalogError::UnknownService(orphan.service_id));
        }

        let overrides = OverrideTable::new(overrides)?;
        Ok(Self { catalog, overrides })
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.overrides)
    }

    pub const fn accessible(&self) -> AccessibleSetQuery<'_> {
        AccessibleSetQuery::new(&self.catalog, &self.overrides)
    }
}
