//! SmartSite Tenant Configuration API
//!
//! REST surface over the site variant catalog, per-tenant feature flags,
//! feature request screening, and super-admin tenant administration.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          SMARTSITE API                              │
//! │                                                                     │
//! │   Bearer JWT ──► AuthUser ──► Role permissions / tenant scope       │
//! │                                   │                                 │
//! │         ┌─────────────────────────┼──────────────────────┐          │
//! │         ▼                         ▼                      ▼          │
//! │  ┌──────────────┐        ┌──────────────┐       ┌──────────────┐    │
//! │  │ Site variants│        │   Tenants    │       │   Feature    │    │
//! │  │ catalog+flags│        │ admin/switch │       │   requests   │    │
//! │  └──────┬───────┘        └──────┬───────┘       └──────┬───────┘    │
//! │         │                       │                      │            │
//! │         ▼                       ▼                      ▼            │
//! │  smartsite-variants ──► smartsite-db (SQLite) ◄── smartsite-screening│
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

use models::*;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartSite API",
        version = "0.1.0",
        description = "SmartSite tenant configuration API",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::site_variants::list_site_variants,
        routes::site_variants::get_tenant_site_variant,
        routes::site_variants::set_tenant_site_variant,
        routes::tenants::list_tenants,
        routes::tenants::tenant_overview,
        routes::tenants::current_tenant,
        routes::tenants::create_tenant,
        routes::tenants::update_tenant,
        routes::tenants::switch_tenant,
        routes::feature_requests::submit_feature_request,
        routes::feature_requests::list_feature_requests,
    ),
    components(
        schemas(
            ErrorResponse, routes::health::HealthResponse,
            SiteVariant, SetSiteVariantRequest, TenantSiteVariantResponse,
            TenantResponse, CreateTenantRequest, UpdateTenantRequest, TenantOverview,
            SwitchTenantRequest, SwitchTenantResponse, CurrentTenantResponse,
            FeatureRequestBody, FeatureRequestResponse, FeatureRequestSummary
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "site-variants", description = "Site variant catalog and tenant assignment"),
        (name = "tenants", description = "Tenant administration"),
        (name = "feature-requests", description = "Feature request screening")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the API router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(routes::site_variants::router())
        .merge(routes::tenants::router())
        .merge(routes::feature_requests::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
    use axum_test::TestServer;
    use smartsite_db::models::tenant::{CreateTenant, Tenant};
    use smartsite_db::DbService;
    use smartsite_screening::{FeatureScreener, ModuleRegistry};
    use uuid::Uuid;

    use crate::middleware::auth::{issue_token, JwtKeys};
    use crate::middleware::Role;
    use crate::{build_router, AppState};

    pub struct TestApp {
        pub server: TestServer,
        pub state: Arc<AppState>,
    }

    /// Router over an in-memory database, with no completion backend
    pub async fn app() -> TestApp {
        let db = DbService::in_memory().await.unwrap();
        let screener = FeatureScreener::new(ModuleRegistry::default(), None, None);
        let state = Arc::new(AppState::new(db, JwtKeys::new("test-secret", 1), screener));
        let server = TestServer::new(build_router(state.clone())).unwrap();

        TestApp { server, state }
    }

    impl TestApp {
        pub async fn tenant(&self, domain: &str) -> Tenant {
            Tenant::create(
                &self.state.db.pool,
                Uuid::new_v4(),
                &CreateTenant {
                    name: domain.to_string(),
                    domain: domain.to_string(),
                    industry: None,
                    plan: None,
                    is_template: None,
                    parent_template: None,
                },
            )
            .await
            .unwrap()
        }

        /// Authorization header for a fresh user with `role` on `tenant_id`
        pub fn bearer(&self, role: Role, tenant_id: Uuid) -> (HeaderName, HeaderValue) {
            let token = issue_token(
                &self.state.auth,
                Uuid::new_v4(),
                tenant_id,
                "user@example.com",
                role,
            )
            .unwrap();

            (
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
            )
        }
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = app().await;
        let doc = app
            .server
            .get("/api-docs/openapi.json")
            .await
            .json::<serde_json::Value>();

        assert!(doc["paths"]["/api/tenants/switch"]["post"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}
