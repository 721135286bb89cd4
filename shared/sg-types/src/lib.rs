//! Sitegate Shared Types
//!
//! Value types shared by the access-control core and the collaborators around
//! it (identity provider, storage layer, routing and rendering layers).

pub mod ids;
pub mod permission;
pub mod principal;
pub mod records;

pub use ids::{CategoryId, GroupId, ServiceId};
pub use permission::{InvalidPermissionLevel, PermissionLevel};
pub use principal::Principal;
pub use records::{Category, GroupServicePermission, Service};
