//! Tenant site variant lookup and assignment

use std::collections::BTreeMap;

use smartsite_db::models::{
    tenant::Tenant, tenant_feature_flag::TenantFeatureFlag,
    tenant_site_variant::TenantSiteVariant,
};
use smartsite_db::DbService;
use smartsite_variants::{by_id, resolve, SiteVariantConfig, VariantSelector};
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};

/// Assignment row, the catalog entry it names, and the stored flags
#[derive(Debug)]
pub struct TenantVariant {
    pub assignment: TenantSiteVariant,
    pub config: &'static SiteVariantConfig,
    pub flags: BTreeMap<String, bool>,
}

/// Build a selector from raw request fields.
///
/// A non-empty `variant_id` wins; otherwise both types are required.
pub fn selector(
    variant_id: Option<&str>,
    website_usage_type: Option<&str>,
    user_type: Option<&str>,
) -> ServiceResult<VariantSelector> {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }

    match (
        present(variant_id),
        present(website_usage_type),
        present(user_type),
    ) {
        (Some(id), _, _) => Ok(VariantSelector::Id(id.to_string())),
        (None, Some(usage), Some(user)) => Ok(VariantSelector::Types {
            usage: usage.to_string(),
            user: user.to_string(),
        }),
        _ => Err(ServiceError::Validation(
            "Either variantId or both websiteUsageType and userType must be provided".into(),
        )),
    }
}

pub async fn get_tenant_variant(db: &DbService, tenant_id: Uuid) -> ServiceResult<TenantVariant> {
    let assignment = TenantSiteVariant::find_latest_by_tenant(&db.pool, tenant_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("No site variant found for this tenant".into()))?;

    let config = by_id(&assignment.variant_id).ok_or_else(|| {
        warn!(
            tenant_id = %tenant_id,
            variant_id = %assignment.variant_id,
            "Stored site variant is not in the catalog"
        );
        ServiceError::NotFound("Variant configuration not found".into())
    })?;

    let flags = TenantFeatureFlag::flag_map(&db.pool, tenant_id).await?;

    Ok(TenantVariant {
        assignment,
        config,
        flags,
    })
}

/// Resolve `selector` and assign it to the tenant, syncing feature flags.
///
/// Lookups that fail return before any write.
pub async fn set_tenant_variant(
    db: &DbService,
    tenant_id: Uuid,
    selector: &VariantSelector,
) -> ServiceResult<TenantVariant> {
    if !Tenant::exists(&db.pool, tenant_id).await? {
        return Err(ServiceError::NotFound("Tenant not found".into()));
    }

    let config = resolve(selector)
        .ok_or_else(|| ServiceError::NotFound("Variant configuration not found".into()))?;

    let assignment = TenantSiteVariant::assign(&db.pool, tenant_id, config).await?;
    let flags = TenantFeatureFlag::flag_map(&db.pool, tenant_id).await?;

    info!(
        tenant_id = %tenant_id,
        variant_id = config.id,
        enabled = flags.values().filter(|on| **on).count(),
        "Tenant site variant set"
    );

    Ok(TenantVariant {
        assignment,
        config,
        flags,
    })
}
