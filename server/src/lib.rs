//! Sitegate Server
//!
//! Site-wide service access control: a catalog of services grouped into
//! categories, per-group permission overrides, and a resolver that decides
//! what a principal may do on each service.

pub mod access;
pub mod cache;
pub mod config;
pub mod db;
pub mod observability;
