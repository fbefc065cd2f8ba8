//! SmartSite Database
//!
//! SQLite persistence for the tenant configuration service:
//! - Connection management ([`DbService`], [`DbConfig`])
//! - Embedded migrations ([`DbService::migrate`])
//! - Row models and queries ([`models`])
//!
//! The only multi-statement write is
//! [`TenantSiteVariant::assign`](models::tenant_site_variant::TenantSiteVariant::assign),
//! which replaces a tenant's variant row and its feature flags in one
//! transaction.

mod connection;
mod error;
pub mod models;

pub use connection::{DbConfig, DbService};
pub use error::DbError;
