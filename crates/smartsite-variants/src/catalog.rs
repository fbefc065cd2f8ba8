//! Site variant catalog
//!
//! One entry per `(WebsiteUsageType, UserType)` pair. Usage type decides the
//! website/content toggles, user type decides the collaboration toggles.

use serde::Serialize;

use crate::features::SiteFeatures;
use crate::types::{UserType, WebsiteUsageType};

/// Static configuration of one site variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteVariantConfig {
    /// Stable identifier, `<usage>_<user>`
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line summary for the selector UI
    pub description: &'static str,
    /// Usage dimension
    pub website_usage_type: WebsiteUsageType,
    /// User dimension
    pub user_type: UserType,
    /// Feature toggles applied to tenants on this variant
    pub features: SiteFeatures,
}

const fn features_for(usage: WebsiteUsageType, user: UserType) -> SiteFeatures {
    let builds_site = matches!(usage, WebsiteUsageType::FullWebsite);
    SiteFeatures {
        website_builder: builds_site,
        page_creator: builds_site,
        foundation_setup: builds_site,
        blog_generator: true,
        content_generator: true,
        cms: true,
        team_collaboration: matches!(user, UserType::Team),
        entrepreneur_support: matches!(user, UserType::SoloEntrepreneur),
    }
}

const fn variant(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    usage: WebsiteUsageType,
    user: UserType,
) -> SiteVariantConfig {
    SiteVariantConfig {
        id,
        name,
        description,
        website_usage_type: usage,
        user_type: user,
        features: features_for(usage, user),
    }
}

/// Every site variant the platform offers
pub static SITE_VARIANTS: [SiteVariantConfig; 6] = [
    variant(
        "full_website_business_owner",
        "Full Website for Business Owners",
        "Complete website builder and content tools for an established business",
        WebsiteUsageType::FullWebsite,
        UserType::BusinessOwner,
    ),
    variant(
        "full_website_solo_entrepreneur",
        "Full Website for Solo Entrepreneurs",
        "Complete website builder with entrepreneur support resources",
        WebsiteUsageType::FullWebsite,
        UserType::SoloEntrepreneur,
    ),
    variant(
        "full_website_team",
        "Full Website for Teams",
        "Complete website builder with multi-user collaboration",
        WebsiteUsageType::FullWebsite,
        UserType::Team,
    ),
    variant(
        "tools_only_business_owner",
        "Content Tools for Business Owners",
        "Content creation tools without website building",
        WebsiteUsageType::ToolsOnly,
        UserType::BusinessOwner,
    ),
    variant(
        "tools_only_solo_entrepreneur",
        "Content Tools for Solo Entrepreneurs",
        "Content creation tools with entrepreneur support resources",
        WebsiteUsageType::ToolsOnly,
        UserType::SoloEntrepreneur,
    ),
    variant(
        "tools_only_team",
        "Content Tools for Teams",
        "Content creation tools with multi-user collaboration",
        WebsiteUsageType::ToolsOnly,
        UserType::Team,
    ),
];

/// Optional catalog filter; `None` means "any"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantFilter {
    /// Keep only this usage type
    pub website_usage_type: Option<WebsiteUsageType>,
    /// Keep only this user type
    pub user_type: Option<UserType>,
}

impl VariantFilter {
    /// Build a filter from raw query values.
    ///
    /// A value that does not parse is dropped, so that dimension is not
    /// filtered on.
    pub fn from_raw(website_usage_type: Option<&str>, user_type: Option<&str>) -> Self {
        Self {
            website_usage_type: website_usage_type.and_then(|v| v.parse().ok()),
            user_type: user_type.and_then(|v| v.parse().ok()),
        }
    }

    /// Whether `config` passes this filter
    pub fn matches(&self, config: &SiteVariantConfig) -> bool {
        self.website_usage_type
            .map_or(true, |usage| usage == config.website_usage_type)
            && self.user_type.map_or(true, |user| user == config.user_type)
    }
}

/// Catalog entries passing `filter`, in catalog order
pub fn variants(filter: &VariantFilter) -> Vec<&'static SiteVariantConfig> {
    SITE_VARIANTS.iter().filter(|v| filter.matches(v)).collect()
}

/// Look up a variant by id
pub fn by_id(id: &str) -> Option<&'static SiteVariantConfig> {
    SITE_VARIANTS.iter().find(|v| v.id == id)
}

/// Look up the variant for a usage/user pair
pub fn by_types(usage: WebsiteUsageType, user: UserType) -> Option<&'static SiteVariantConfig> {
    SITE_VARIANTS
        .iter()
        .find(|v| v.website_usage_type == usage && v.user_type == user)
}

/// How a caller names the variant to assign
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSelector {
    /// Explicit catalog id
    Id(String),
    /// Raw usage/user pair as received
    Types {
        /// Website usage type, e.g. `tools_only`
        usage: String,
        /// User type, e.g. `team`
        user: String,
    },
}

/// Resolve a selector against the catalog.
///
/// Unparseable type values resolve to `None`, the same as a pair with no
/// catalog entry.
pub fn resolve(selector: &VariantSelector) -> Option<&'static SiteVariantConfig> {
    match selector {
        VariantSelector::Id(id) => by_id(id),
        VariantSelector::Types { usage, user } => {
            let usage = usage.parse().ok()?;
            let user = user.parse().ok()?;
            by_types(usage, user)
        }
    }
}
