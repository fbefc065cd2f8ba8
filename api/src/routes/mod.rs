//! API Routes

pub mod feature_requests;
pub mod health;
pub mod site_variants;
pub mod tenants;
