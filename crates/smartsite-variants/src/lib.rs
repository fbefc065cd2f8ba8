//! SmartSite Site Variants
//!
//! Static catalog of site variants. A variant is a combination of how a
//! tenant uses the platform (full website or content tools only) and who is
//! using it (business owner, solo entrepreneur, team), mapped to a fixed set
//! of feature toggles.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    SITE VARIANT CATALOG                       │
//! │                                                               │
//! │   WebsiteUsageType × UserType ──► SiteVariantConfig           │
//! │                                        │                      │
//! │                                        ▼                      │
//! │                         SiteFeatures (one bool per FeatureKey)│
//! │                                        │                      │
//! │                                        ▼                      │
//! │                    tenant_feature_flags (smartsite-db)        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is linked into the binary and never changes at runtime.
//! Every lookup here is a pure function over [`SITE_VARIANTS`].

#![warn(missing_docs)]

pub mod catalog;
pub mod features;
pub mod types;

pub use catalog::{
    by_id, by_types, resolve, variants, SiteVariantConfig, VariantFilter, VariantSelector,
    SITE_VARIANTS,
};
pub use features::{FeatureKey, SiteFeatures};
pub use types::{ParseTypeError, UserType, WebsiteUsageType};
