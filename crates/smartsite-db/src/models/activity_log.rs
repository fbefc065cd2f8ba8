use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow, SqlitePool, Type};
use uuid::Uuid;

/// Administrative actions that leave an audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "activity_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    TenantSwitch,
    TenantCreate,
    TenantUpdate,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: Uuid,
    pub user_role: String,
    pub action_type: ActivityAction,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub details: Json<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Uuid,
    pub user_role: String,
    pub action_type: ActivityAction,
    pub entity_type: &'static str,
    pub entity_id: Uuid,
    pub details: Value,
}

impl ActivityLog {
    pub async fn record(pool: &SqlitePool, entry: &NewActivity) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs (user_id, user_role, action_type, entity_type, entity_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, user_role, action_type, entity_type, entity_id, details, created_at
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.user_role)
        .bind(entry.action_type)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(Json(&entry.details))
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// Newest first
    pub async fn find_by_entity(
        pool: &SqlitePool,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, user_id, user_role, action_type, entity_type, entity_id, details, created_at
            FROM activity_logs
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY id DESC
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_and_find_by_entity() {
        let db = test_support::db().await;
        let tenant = test_support::tenant(&db, "audit.example").await;
        let user = Uuid::new_v4();

        ActivityLog::record(
            &db.pool,
            &NewActivity {
                user_id: user,
                user_role: "super_admin".into(),
                action_type: ActivityAction::TenantCreate,
                entity_type: "tenant",
                entity_id: tenant.id,
                details: json!({ "domain": "audit.example" }),
            },
        )
        .await
        .unwrap();

        ActivityLog::record(
            &db.pool,
            &NewActivity {
                user_id: user,
                user_role: "super_admin".into(),
                action_type: ActivityAction::TenantUpdate,
                entity_type: "tenant",
                entity_id: tenant.id,
                details: json!({ "changedFields": ["plan"] }),
            },
        )
        .await
        .unwrap();

        let entries = ActivityLog::find_by_entity(&db.pool, "tenant", tenant.id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action_type, ActivityAction::TenantUpdate);
        assert_eq!(entries[0].details.0["changedFields"][0], "plan");
        assert_eq!(entries[1].action_type, ActivityAction::TenantCreate);
        assert_eq!(entries[1].user_id, user);
    }
}
