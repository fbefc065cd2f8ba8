use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

/// A screened feature request as stored
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequestRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub description: String,
    pub category: String,
    pub matched_module: Option<String>,
    pub request_kind: Option<String>,
    pub sent_to_dev: bool,
    pub wishlist_submitted: bool,
    pub classifier_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeatureRequest {
    pub tenant_id: Uuid,
    pub description: String,
    pub category: String,
    pub matched_module: Option<String>,
    pub request_kind: Option<String>,
    pub sent_to_dev: bool,
    pub wishlist_submitted: bool,
    pub classifier_error: Option<String>,
}

const FEATURE_REQUEST_COLUMNS: &str = "id, tenant_id, description, category, matched_module, request_kind, sent_to_dev, wishlist_submitted, classifier_error, created_at";

impl FeatureRequestRecord {
    pub async fn create(
        pool: &SqlitePool,
        data: &NewFeatureRequest,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FeatureRequestRecord>(&format!(
            r#"
            INSERT INTO feature_requests (id, tenant_id, description, category, matched_module, request_kind, sent_to_dev, wishlist_submitted, classifier_error, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {FEATURE_REQUEST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(data.tenant_id)
        .bind(&data.description)
        .bind(&data.category)
        .bind(&data.matched_module)
        .bind(&data.request_kind)
        .bind(data.sent_to_dev)
        .bind(data.wishlist_submitted)
        .bind(&data.classifier_error)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// Record that the wishlist collector accepted this request
    pub async fn mark_wishlist_submitted(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE feature_requests SET wishlist_submitted = 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Newest first
    pub async fn find_by_tenant(
        pool: &SqlitePool,
        tenant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, FeatureRequestRecord>(&format!(
            "SELECT {FEATURE_REQUEST_COLUMNS} FROM feature_requests WHERE tenant_id = $1 ORDER BY created_at DESC"
        ))
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }
}
