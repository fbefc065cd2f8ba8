//! Site variant catalog and per-tenant assignment endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use smartsite_variants::{variants, VariantFilter};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{AuthUser, Permission};
use crate::models::{SetSiteVariantRequest, SiteVariant, TenantSiteVariantResponse, VariantQuery};
use crate::services::site_variants::{self, TenantVariant};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/site-variants", get(list_site_variants))
        .route(
            "/tenant/:tenant_id/site-variant",
            get(get_tenant_site_variant).post(set_tenant_site_variant),
        )
}

impl From<TenantVariant> for TenantSiteVariantResponse {
    fn from(view: TenantVariant) -> Self {
        let TenantVariant {
            assignment,
            config,
            flags,
        } = view;

        Self {
            id: assignment.id,
            tenant_id: assignment.tenant_id,
            variant_id: assignment.variant_id,
            website_usage_type: assignment.website_usage_type,
            user_type: assignment.user_type,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
            config: SiteVariant::from(config),
            feature_flags: flags,
        }
    }
}

/// List the site variant catalog
#[utoipa::path(
    get,
    path = "/api/site-variants",
    params(VariantQuery),
    responses(
        (status = 200, description = "Matching catalog entries", body = [SiteVariant])
    ),
    tag = "site-variants"
)]
pub async fn list_site_variants(Query(query): Query<VariantQuery>) -> Json<Vec<SiteVariant>> {
    let filter = VariantFilter::from_raw(
        query.website_usage_type.as_deref(),
        query.user_type.as_deref(),
    );

    Json(variants(&filter).into_iter().map(SiteVariant::from).collect())
}

/// Get a tenant's site variant and feature flags
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/site-variant",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Current assignment", body = TenantSiteVariantResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Tenant not accessible", body = ErrorResponse),
        (status = 404, description = "No assignment", body = ErrorResponse)
    ),
    tag = "site-variants",
    security(("bearer" = []))
)]
pub async fn get_tenant_site_variant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(tenant_id): ApiPath<Uuid>,
) -> ApiResult<Json<TenantSiteVariantResponse>> {
    user.require(Permission::SiteVariantsRead)?;
    user.ensure_tenant_access(tenant_id)?;

    let view = site_variants::get_tenant_variant(&state.db, tenant_id).await?;
    Ok(Json(view.into()))
}

/// Assign a site variant to a tenant and sync its feature flags
#[utoipa::path(
    post,
    path = "/api/tenant/{tenant_id}/site-variant",
    params(("tenant_id" = Uuid, Path, description = "Tenant ID")),
    request_body = SetSiteVariantRequest,
    responses(
        (status = 200, description = "Assignment stored", body = TenantSiteVariantResponse),
        (status = 400, description = "No variant selector", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Tenant not accessible", body = ErrorResponse),
        (status = 404, description = "Unknown tenant or variant", body = ErrorResponse)
    ),
    tag = "site-variants",
    security(("bearer" = []))
)]
pub async fn set_tenant_site_variant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(tenant_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<SetSiteVariantRequest>,
) -> ApiResult<Json<TenantSiteVariantResponse>> {
    user.require(Permission::SiteVariantsWrite)?;
    user.ensure_tenant_access(tenant_id)?;

    let selector = site_variants::selector(
        body.variant_id.as_deref(),
        body.website_usage_type.as_deref(),
        body.user_type.as_deref(),
    )?;

    let view = site_variants::set_tenant_variant(&state.db, tenant_id, &selector).await?;
    Ok(Json(view.into()))
}
