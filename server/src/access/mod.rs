//! Service access control.
//!
//! Three permission sources are combined per service:
//! - Anonymous ceiling: a floor every principal gets
//! - Authenticated ceiling: any logged-in principal
//! - Group overrides: per-group grants, maximum across the principal's groups
//!
//! Two hard rules short-circuit before the additive part: superusers hold
//! every level everywhere, and closed services grant nothing to anyone else.

pub mod accessible;
pub mod catalog;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod overrides;
pub mod resolver;
pub mod snapshot;

pub use accessible::AccessibleSetQuery;
pub use catalog::Catalog;
pub use error::{AccessError, CatalogError};
pub use guard::{authorize_name, authorize_path, normalize_path};
pub use navigator::{NavEntry, NavLink, Navigator};
pub use overrides::{GroupGrants, OverrideTable};
pub use resolver::{compute_service_permission, PrincipalResolver, Resolver};
pub use snapshot::AccessSnapshot;
