use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartsite_variants::{FeatureKey, SiteFeatures};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// One `(tenant, feature)` toggle
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantFeatureFlag {
    pub tenant_id: Uuid,
    pub feature_key: String,
    pub is_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl TenantFeatureFlag {
    pub async fn find_by_tenant(
        pool: &SqlitePool,
        tenant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TenantFeatureFlag>(
            r#"
            SELECT tenant_id, feature_key, is_enabled, updated_at
            FROM tenant_feature_flags
            WHERE tenant_id = $1
            ORDER BY feature_key
            "#,
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }

    /// Flags keyed by feature key, as served to the admin UI
    pub async fn flag_map(
        pool: &SqlitePool,
        tenant_id: Uuid,
    ) -> Result<BTreeMap<String, bool>, sqlx::Error> {
        Ok(Self::find_by_tenant(pool, tenant_id)
            .await?
            .into_iter()
            .map(|flag| (flag.feature_key, flag.is_enabled))
            .collect())
    }

    /// Make the tenant's flag rows equal `features`.
    ///
    /// Runs on the caller's connection so it joins the caller's
    /// transaction. Rows whose key is not a [`FeatureKey`] are removed.
    pub async fn sync(
        conn: &mut SqliteConnection,
        tenant_id: Uuid,
        features: &SiteFeatures,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now();

        for (key, enabled) in features.iter() {
            sqlx::query(
                r#"
                INSERT INTO tenant_feature_flags (tenant_id, feature_key, is_enabled, updated_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (tenant_id, feature_key)
                DO UPDATE SET is_enabled = excluded.is_enabled, updated_at = excluded.updated_at
                "#,
            )
            .bind(tenant_id)
            .bind(key.as_str())
            .bind(enabled)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }

        let stored: Vec<String> = sqlx::query_scalar(
            "SELECT feature_key FROM tenant_feature_flags WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_all(&mut *conn)
        .await?;

        for stale in stored.iter().filter(|k| k.parse::<FeatureKey>().is_err()) {
            sqlx::query(
                "DELETE FROM tenant_feature_flags WHERE tenant_id = $1 AND feature_key = $2",
            )
            .bind(tenant_id)
            .bind(stale)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
