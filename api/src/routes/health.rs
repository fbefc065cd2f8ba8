//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the database is unreachable
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = match sqlx::query("SELECT 1").execute(&state.db.pool).await {
        Ok(_) => "healthy",
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = test_support::app().await;
        let response = app.server.get("/health").await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
