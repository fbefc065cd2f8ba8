//! Tenant administration endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{AuthUser, Permission};
use crate::models::{
    CreateTenantRequest, CurrentTenantResponse, SwitchTenantRequest, SwitchTenantResponse,
    TenantOverview, TenantResponse, UpdateTenantRequest,
};
use crate::services::tenants;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tenants", get(list_tenants).post(create_tenant))
        .route("/tenants/overview", get(tenant_overview))
        .route("/tenants/current", get(current_tenant))
        .route("/tenants/switch", post(switch_tenant))
        .route("/tenants/:id", patch(update_tenant))
}

/// List all tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    responses(
        (status = 200, description = "All tenants, oldest first", body = [TenantResponse]),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "tenants",
    security(("bearer" = []))
)]
pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<TenantResponse>>> {
    user.require(Permission::TenantsRead)?;

    let tenants = tenants::list(&state.db).await?;
    Ok(Json(tenants.into_iter().map(TenantResponse::from).collect()))
}

/// Tenant counts by status, template flag and industry
#[utoipa::path(
    get,
    path = "/api/tenants/overview",
    responses(
        (status = 200, description = "Aggregate counts", body = TenantOverview),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "tenants",
    security(("bearer" = []))
)]
pub async fn tenant_overview(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<TenantOverview>> {
    user.require(Permission::TenantsRead)?;

    Ok(Json(tenants::overview(&state.db).await?))
}

/// The tenant the caller is currently acting on
#[utoipa::path(
    get,
    path = "/api/tenants/current",
    responses(
        (status = 200, description = "Current tenant context", body = CurrentTenantResponse),
        (status = 404, description = "Tenant no longer exists", body = ErrorResponse)
    ),
    tag = "tenants",
    security(("bearer" = []))
)]
pub async fn current_tenant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<CurrentTenantResponse>> {
    let tenant = tenants::current(&state.db, &state.sessions, &user).await?;
    let switched = tenant.id != user.tenant_id;

    Ok(Json(CurrentTenantResponse {
        tenant: tenant.into(),
        switched,
    }))
}

/// Create a tenant
#[utoipa::path(
    post,
    path = "/api/tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = TenantResponse),
        (status = 400, description = "Missing name or domain", body = ErrorResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse),
        (status = 404, description = "Parent template not found", body = ErrorResponse),
        (status = 409, description = "Domain already in use", body = ErrorResponse)
    ),
    tag = "tenants",
    security(("bearer" = []))
)]
pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(body): ApiJson<CreateTenantRequest>,
) -> ApiResult<(StatusCode, Json<TenantResponse>)> {
    user.require(Permission::TenantsManage)?;

    let tenant = tenants::create(&state.db, &user, body).await?;
    Ok((StatusCode::CREATED, Json(tenant.into())))
}

/// Update a tenant's details or status
#[utoipa::path(
    patch,
    path = "/api/tenants/{id}",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Tenant updated", body = TenantResponse),
        (status = 400, description = "Invalid field value", body = ErrorResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse),
        (status = 409, description = "Domain already in use", body = ErrorResponse)
    ),
    tag = "tenants",
    security(("bearer" = []))
)]
pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateTenantRequest>,
) -> ApiResult<Json<TenantResponse>> {
    user.require(Permission::TenantsManage)?;

    let tenant = tenants::update(&state.db, &user, id, body).await?;
    Ok(Json(tenant.into()))
}

/// Switch the super-admin's tenant context
#[utoipa::path(
    post,
    path = "/api/tenants/switch",
    request_body = SwitchTenantRequest,
    responses(
        (status = 200, description = "Context switched", body = SwitchTenantResponse),
        (status = 400, description = "Missing tenant id", body = ErrorResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    tag = "tenants",
    security(("bearer" = []))
)]
pub async fn switch_tenant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(body): ApiJson<SwitchTenantRequest>,
) -> ApiResult<Json<SwitchTenantResponse>> {
    // Role is checked after the body so a missing id is a 400 for everyone
    let (tenant, previous) =
        tenants::switch(&state.db, &state.sessions, &user, body.tenant_id).await?;

    Ok(Json(SwitchTenantResponse {
        success: true,
        tenant: tenant.into(),
        previous_tenant_id: previous,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use smartsite_db::models::activity_log::{ActivityAction, ActivityLog};
    use uuid::Uuid;

    use crate::middleware::Role;
    use crate::models::{
        CurrentTenantResponse, SwitchTenantResponse, TenantOverview, TenantResponse,
    };
    use crate::test_support;

    #[tokio::test]
    async fn test_create_list_and_overview() {
        let app = test_support::app().await;
        let home = app.tenant("platform.example").await;
        let (name, value) = app.bearer(Role::SuperAdmin, home.id);

        let created = app
            .server
            .post("/api/tenants")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "name": " Bakery ", "domain": "Bakery.Example", "industry": "food" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let bakery = created.json::<TenantResponse>();
        assert_eq!(bakery.name, "Bakery");
        assert_eq!(bakery.domain, "bakery.example");
        assert_eq!(bakery.status, "active");

        let duplicate = app
            .server
            .post("/api/tenants")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "name": "Copy", "domain": "bakery.example" }))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
        assert_eq!(duplicate.json::<Value>()["error"], "conflict");

        let blank = app
            .server
            .post("/api/tenants")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "name": "No domain" }))
            .await;
        blank.assert_status(StatusCode::BAD_REQUEST);

        let all = app
            .server
            .get("/api/tenants")
            .add_header(name.clone(), value.clone())
            .await
            .json::<Vec<TenantResponse>>();
        assert_eq!(all.len(), 2);

        let overview = app
            .server
            .get("/api/tenants/overview")
            .add_header(name, value)
            .await
            .json::<TenantOverview>();
        assert_eq!(overview.total_tenants, 2);
        assert_eq!(overview.active_tenants, 2);
        assert_eq!(overview.tenants_by_industry.get("food"), Some(&1));

        let logged = ActivityLog::find_by_entity(&app.state.db.pool, "tenant", bakery.id)
            .await
            .unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].action_type, ActivityAction::TenantCreate);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_tenant_admins() {
        let app = test_support::app().await;
        let tenant = app.tenant("acme.example").await;
        let (name, value) = app.bearer(Role::Admin, tenant.id);

        app.server
            .get("/api/tenants")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.server
            .post("/api/tenants")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "name": "Other", "domain": "other.example" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.server
            .patch(&format!("/api/tenants/{}", tenant.id))
            .add_header(name, value)
            .json(&json!({ "status": "suspended" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_status() {
        let app = test_support::app().await;
        let tenant = app.tenant("acme.example").await;
        let (name, value) = app.bearer(Role::SuperAdmin, tenant.id);

        let updated = app
            .server
            .patch(&format!("/api/tenants/{}", tenant.id))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "status": "suspended" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<TenantResponse>().status, "suspended");

        app.server
            .patch(&format!("/api/tenants/{}", tenant.id))
            .add_header(name.clone(), value.clone())
            .json(&json!({ "status": "archived" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .patch(&format!("/api/tenants/{}", Uuid::new_v4()))
            .add_header(name, value)
            .json(&json!({ "name": "Ghost" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_switch_and_current() {
        let app = test_support::app().await;
        let home = app.tenant("platform.example").await;
        let target = app.tenant("acme.example").await;
        let (name, value) = app.bearer(Role::SuperAdmin, home.id);

        let before = app
            .server
            .get("/api/tenants/current")
            .add_header(name.clone(), value.clone())
            .await
            .json::<CurrentTenantResponse>();
        assert_eq!(before.tenant.id, home.id);
        assert!(!before.switched);

        let switched = app
            .server
            .post("/api/tenants/switch")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "tenantId": target.id }))
            .await;
        switched.assert_status_ok();
        let switched = switched.json::<SwitchTenantResponse>();
        assert!(switched.success);
        assert_eq!(switched.tenant.id, target.id);
        assert_eq!(switched.previous_tenant_id, home.id);

        let after = app
            .server
            .get("/api/tenants/current")
            .add_header(name, value)
            .await
            .json::<CurrentTenantResponse>();
        assert_eq!(after.tenant.id, target.id);
        assert!(after.switched);
    }

    #[tokio::test]
    async fn test_switch_error_order() {
        let app = test_support::app().await;
        let tenant = app.tenant("acme.example").await;
        let (admin_name, admin_value) = app.bearer(Role::Admin, tenant.id);
        let (super_name, super_value) = app.bearer(Role::SuperAdmin, tenant.id);

        // Missing id is rejected before the role check
        app.server
            .post("/api/tenants/switch")
            .add_header(admin_name.clone(), admin_value.clone())
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        app.server
            .post("/api/tenants/switch")
            .add_header(admin_name, admin_value)
            .json(&json!({ "tenantId": tenant.id }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.server
            .post("/api/tenants/switch")
            .add_header(super_name.clone(), super_value.clone())
            .json(&json!({ "tenantId": Uuid::new_v4() }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let not_a_uuid = app
            .server
            .post("/api/tenants/switch")
            .add_header(super_name, super_value)
            .json(&json!({ "tenantId": "abc" }))
            .await;
        not_a_uuid.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(not_a_uuid.json::<Value>()["error"], "validation_error");
    }
}
