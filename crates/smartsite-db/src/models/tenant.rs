use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use uuid::Uuid;

/// Lifecycle state of a tenant. Tenants are never deleted, only moved
/// between these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize, Default)]
#[sqlx(type_name = "tenant_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl TenantStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
            TenantStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for TenantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TenantStatus::Active),
            "inactive" => Ok(TenantStatus::Inactive),
            "suspended" => Ok(TenantStatus::Suspended),
            other => Err(format!("unknown tenant status: {other}")),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub industry: Option<String>,
    pub plan: String,
    pub is_template: bool,
    pub parent_template: Option<Uuid>,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenant {
    pub name: String,
    pub domain: String,
    pub industry: Option<String>,
    pub plan: Option<String>,
    pub is_template: Option<bool>,
    pub parent_template: Option<Uuid>,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub plan: Option<String>,
    pub is_template: Option<bool>,
    pub status: Option<TenantStatus>,
}

impl UpdateTenant {
    /// Names of the fields this update touches, as sent on the wire
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.domain.is_some() {
            fields.push("domain");
        }
        if self.industry.is_some() {
            fields.push("industry");
        }
        if self.plan.is_some() {
            fields.push("plan");
        }
        if self.is_template.is_some() {
            fields.push("isTemplate");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        fields
    }
}

const DEFAULT_PLAN: &str = "standard";

const TENANT_COLUMNS: &str = "id, name, domain, industry, plan, is_template, parent_template, status, created_at, updated_at";

impl Tenant {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateTenant,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Tenant>(&format!(
            r#"
            INSERT INTO tenants (id, name, domain, industry, plan, is_template, parent_template, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.domain)
        .bind(&data.industry)
        .bind(data.plan.as_deref().unwrap_or(DEFAULT_PLAN))
        .bind(data.is_template.unwrap_or(false))
        .bind(data.parent_template)
        .bind(TenantStatus::Active)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_domain(
        pool: &SqlitePool,
        domain: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE domain = $1"
        ))
        .bind(domain)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants ORDER BY created_at ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Apply `data` to the tenant; `None` when the tenant does not exist
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateTenant,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tenant>(&format!(
            r#"
            UPDATE tenants
            SET name        = COALESCE($2, name),
                domain      = COALESCE($3, domain),
                industry    = COALESCE($4, industry),
                plan        = COALESCE($5, plan),
                is_template = COALESCE($6, is_template),
                status      = COALESCE($7, status),
                updated_at  = $8
            WHERE id = $1
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.domain)
        .bind(&data.industry)
        .bind(&data.plan)
        .bind(data.is_template)
        .bind(data.status)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }
}
