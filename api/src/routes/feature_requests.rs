//! Feature request screening endpoints
//!
//! Requests are filed against the caller's current tenant, which for a
//! super-admin is the tenant they last switched to.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::{AuthUser, Permission};
use crate::models::{FeatureRequestBody, FeatureRequestResponse, FeatureRequestSummary};
use crate::services::{feature_requests, tenants};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/feature-requests",
        get(list_feature_requests).post(submit_feature_request),
    )
}

/// Screen a feature request
#[utoipa::path(
    post,
    path = "/api/feature-requests",
    request_body = FeatureRequestBody,
    responses(
        (status = 201, description = "Request screened and stored", body = FeatureRequestResponse),
        (status = 400, description = "Empty description", body = ErrorResponse),
        (status = 403, description = "Role may not file requests", body = ErrorResponse)
    ),
    tag = "feature-requests",
    security(("bearer" = []))
)]
pub async fn submit_feature_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(body): ApiJson<FeatureRequestBody>,
) -> ApiResult<(StatusCode, Json<FeatureRequestResponse>)> {
    user.require(Permission::FeatureRequestsWrite)?;

    let tenant_id = tenants::current_tenant_id(&state.sessions, &user);
    let (record, outcome) =
        feature_requests::submit(&state.db, &state.screener, tenant_id, &body.description)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(FeatureRequestResponse::new(record.id, outcome)),
    ))
}

/// Feature requests filed for the current tenant, newest first
#[utoipa::path(
    get,
    path = "/api/feature-requests",
    responses(
        (status = 200, description = "Request history", body = [FeatureRequestSummary])
    ),
    tag = "feature-requests",
    security(("bearer" = []))
)]
pub async fn list_feature_requests(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<FeatureRequestSummary>>> {
    user.require(Permission::FeatureRequestsRead)?;

    let tenant_id = tenants::current_tenant_id(&state.sessions, &user);
    let records = feature_requests::list(&state.db, tenant_id).await?;
    Ok(Json(
        records.into_iter().map(FeatureRequestSummary::from).collect(),
    ))
}
