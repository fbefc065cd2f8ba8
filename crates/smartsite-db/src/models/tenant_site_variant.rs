use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartsite_variants::SiteVariantConfig;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::tenant_feature_flag::TenantFeatureFlag;

/// The variant currently assigned to a tenant
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSiteVariant {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub variant_id: String,
    pub website_usage_type: String,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantSiteVariant {
    pub async fn find_latest_by_tenant(
        pool: &SqlitePool,
        tenant_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TenantSiteVariant>(
            r#"
            SELECT id, tenant_id, variant_id, website_usage_type, user_type, created_at, updated_at
            FROM tenant_site_variants
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count_for_tenant(pool: &SqlitePool, tenant_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tenant_site_variants WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(pool)
            .await
    }

    /// Assign `config` to the tenant and bring its feature flags in line.
    ///
    /// The assignment row and every flag row are written in one transaction.
    /// If any statement fails the transaction guard is dropped without
    /// commit, which rolls everything back and returns the connection to
    /// the pool.
    pub async fn assign(
        pool: &SqlitePool,
        tenant_id: Uuid,
        config: &SiteVariantConfig,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let now = Utc::now();

        let record = sqlx::query_as::<_, TenantSiteVariant>(
            r#"
            INSERT INTO tenant_site_variants (id, tenant_id, variant_id, website_usage_type, user_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (tenant_id) DO UPDATE
            SET variant_id         = excluded.variant_id,
                website_usage_type = excluded.website_usage_type,
                user_type          = excluded.user_type,
                updated_at         = excluded.updated_at
            RETURNING id, tenant_id, variant_id, website_usage_type, user_type, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(config.id)
        .bind(config.website_usage_type.as_str())
        .bind(config.user_type.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        TenantFeatureFlag::sync(&mut *tx, tenant_id, &config.features).await?;

        tx.commit().await?;

        debug!(
            tenant_id = %tenant_id,
            variant_id = config.id,
            "Site variant assigned and feature flags synced"
        );

        Ok(record)
    }
}
