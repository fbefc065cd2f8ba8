//! API Models
//!
//! Wire shapes for request and response bodies. All fields are camelCase.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartsite_db::models::{feature_request::FeatureRequestRecord, tenant::Tenant};
use smartsite_screening::ScreeningOutcome;
use smartsite_variants::SiteVariantConfig;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ============ Site variants ============

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteVariant {
    pub id: String,
    pub name: String,
    pub description: String,
    /// `full_website` or `tools_only`
    pub website_usage_type: String,
    /// `business_owner`, `solo_entrepreneur` or `team`
    pub user_type: String,
    pub features: BTreeMap<String, bool>,
}

impl From<&SiteVariantConfig> for SiteVariant {
    fn from(config: &SiteVariantConfig) -> Self {
        Self {
            id: config.id.to_string(),
            name: config.name.to_string(),
            description: config.description.to_string(),
            website_usage_type: config.website_usage_type.as_str().to_string(),
            user_type: config.user_type.as_str().to_string(),
            features: config
                .features
                .iter()
                .map(|(key, on)| (key.as_str().to_string(), on))
                .collect(),
        }
    }
}

/// Catalog filter; unrecognised values are ignored
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VariantQuery {
    pub website_usage_type: Option<String>,
    pub user_type: Option<String>,
}

/// Either `variantId`, or both `websiteUsageType` and `userType`
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetSiteVariantRequest {
    pub variant_id: Option<String>,
    pub website_usage_type: Option<String>,
    pub user_type: Option<String>,
}

/// A tenant's assignment with its resolved config and live flags
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantSiteVariantResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub variant_id: String,
    pub website_usage_type: String,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub config: SiteVariant,
    pub feature_flags: BTreeMap<String, bool>,
}

// ============ Tenants ============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub industry: Option<String>,
    pub plan: String,
    pub is_template: bool,
    pub parent_template: Option<Uuid>,
    /// `active`, `inactive` or `suspended`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            domain: tenant.domain,
            industry: tenant.industry,
            plan: tenant.plan,
            is_template: tenant.is_template,
            parent_template: tenant.parent_template,
            status: tenant.status.as_str().to_string(),
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
    pub industry: Option<String>,
    pub plan: Option<String>,
    pub is_template: Option<bool>,
    pub parent_template: Option<Uuid>,
}

/// Partial update; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub plan: Option<String>,
    pub is_template: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantOverview {
    pub total_tenants: usize,
    pub active_tenants: usize,
    pub inactive_tenants: usize,
    pub suspended_tenants: usize,
    pub template_tenants: usize,
    pub tenants_by_industry: BTreeMap<String, usize>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTenantRequest {
    pub tenant_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTenantResponse {
    pub success: bool,
    pub tenant: TenantResponse,
    pub previous_tenant_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTenantResponse {
    pub tenant: TenantResponse,
    /// True when a super-admin has switched away from their own tenant
    pub switched: bool,
}

// ============ Feature requests ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequestBody {
    #[serde(default)]
    pub description: String,
}

/// Screening decision returned to the requester
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequestResponse {
    pub id: Uuid,
    /// `template_ready`, `simple_custom` or `wishlist`
    pub category: String,
    pub matched_module: Option<String>,
    pub response: String,
    pub should_submit_to_dev: bool,
    /// Set for wishlist items: `screen`, `feature`, `automation` or `unknown`
    pub request_kind: Option<String>,
    pub wishlist_submitted: bool,
}

impl FeatureRequestResponse {
    pub fn new(id: Uuid, outcome: ScreeningOutcome) -> Self {
        Self {
            id,
            category: outcome.category.as_str().to_string(),
            matched_module: outcome.matched_module,
            response: outcome.response,
            should_submit_to_dev: outcome.should_submit_to_dev,
            request_kind: outcome.request_kind.map(|k| k.as_str().to_string()),
            wishlist_submitted: outcome.wishlist_submitted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequestSummary {
    pub id: Uuid,
    pub description: String,
    pub category: String,
    pub matched_module: Option<String>,
    pub request_kind: Option<String>,
    pub sent_to_dev: bool,
    pub wishlist_submitted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FeatureRequestRecord> for FeatureRequestSummary {
    fn from(record: FeatureRequestRecord) -> Self {
        Self {
            id: record.id,
            description: record.description,
            category: record.category,
            matched_module: record.matched_module,
            request_kind: record.request_kind,
            sent_to_dev: record.sent_to_dev,
            wishlist_submitted: record.wishlist_submitted,
            created_at: record.created_at,
        }
    }
}
