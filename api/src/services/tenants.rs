//! Tenant administration and super-admin context switching

use serde_json::json;
use smartsite_db::models::activity_log::{ActivityAction, ActivityLog, NewActivity};
use smartsite_db::models::tenant::{CreateTenant, Tenant, TenantStatus, UpdateTenant};
use smartsite_db::DbService;
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::middleware::permissions::has_permission;
use crate::middleware::{AuthUser, Permission};
use crate::models::{CreateTenantRequest, TenantOverview, UpdateTenantRequest};
use crate::state::TenantSessions;

const TENANT_ENTITY: &str = "tenant";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

fn domain_conflict() -> ServiceError {
    ServiceError::Conflict("Domain is already in use".into())
}

/// Audit entries are best effort; a failed write does not fail the request
async fn record_activity(
    db: &DbService,
    actor: &AuthUser,
    action: ActivityAction,
    tenant_id: Uuid,
    details: serde_json::Value,
) {
    let entry = NewActivity {
        user_id: actor.user_id,
        user_role: actor.role.as_str().to_string(),
        action_type: action,
        entity_type: TENANT_ENTITY,
        entity_id: tenant_id,
        details,
    };

    if let Err(e) = ActivityLog::record(&db.pool, &entry).await {
        warn!(error = %e, action = ?action, tenant_id = %tenant_id, "Failed to record activity");
    }
}

pub async fn list(db: &DbService) -> ServiceResult<Vec<Tenant>> {
    Ok(Tenant::find_all(&db.pool).await?)
}

pub async fn overview(db: &DbService) -> ServiceResult<TenantOverview> {
    let tenants = Tenant::find_all(&db.pool).await?;
    let count = |status: TenantStatus| tenants.iter().filter(|t| t.status == status).count();

    let mut tenants_by_industry = std::collections::BTreeMap::new();
    for industry in tenants.iter().filter_map(|t| t.industry.as_deref()) {
        *tenants_by_industry.entry(industry.to_string()).or_insert(0) += 1;
    }

    Ok(TenantOverview {
        total_tenants: tenants.len(),
        active_tenants: count(TenantStatus::Active),
        inactive_tenants: count(TenantStatus::Inactive),
        suspended_tenants: count(TenantStatus::Suspended),
        template_tenants: tenants.iter().filter(|t| t.is_template).count(),
        tenants_by_industry,
    })
}

pub async fn create(
    db: &DbService,
    actor: &AuthUser,
    request: CreateTenantRequest,
) -> ServiceResult<Tenant> {
    let name = request.name.trim();
    let domain = request.domain.trim().to_lowercase();
    if name.is_empty() || domain.is_empty() {
        return Err(ServiceError::Validation("Name and domain are required".into()));
    }

    if Tenant::find_by_domain(&db.pool, &domain).await?.is_some() {
        return Err(domain_conflict());
    }

    if let Some(parent) = request.parent_template {
        if !Tenant::exists(&db.pool, parent).await? {
            return Err(ServiceError::NotFound("Parent template not found".into()));
        }
    }

    let data = CreateTenant {
        name: name.to_string(),
        domain,
        industry: request.industry,
        plan: request.plan,
        is_template: request.is_template,
        parent_template: request.parent_template,
    };

    let tenant = Tenant::create(&db.pool, Uuid::new_v4(), &data)
        .await
        .map_err(|e| if is_unique_violation(&e) { domain_conflict() } else { e.into() })?;

    info!(tenant_id = %tenant.id, domain = %tenant.domain, "Tenant created");
    record_activity(
        db,
        actor,
        ActivityAction::TenantCreate,
        tenant.id,
        json!({ "tenantName": tenant.name, "domain": tenant.domain }),
    )
    .await;

    Ok(tenant)
}

pub async fn update(
    db: &DbService,
    actor: &AuthUser,
    tenant_id: Uuid,
    request: UpdateTenantRequest,
) -> ServiceResult<Tenant> {
    let status = request
        .status
        .as_deref()
        .map(str::parse::<TenantStatus>)
        .transpose()
        .map_err(ServiceError::Validation)?;

    let non_blank = |field: &str, value: Option<String>| match value {
        Some(v) if v.trim().is_empty() => Err(ServiceError::Validation(format!("{field} cannot be empty"))),
        other => Ok(other.map(|v| v.trim().to_string())),
    };

    let patch = UpdateTenant {
        name: non_blank("name", request.name)?,
        domain: non_blank("domain", request.domain)?.map(|d| d.to_lowercase()),
        industry: request.industry,
        plan: request.plan,
        is_template: request.is_template,
        status,
    };

    let tenant = Tenant::update(&db.pool, tenant_id, &patch)
        .await
        .map_err(|e| if is_unique_violation(&e) { domain_conflict() } else { e.into() })?
        .ok_or_else(|| ServiceError::NotFound("Tenant not found".into()))?;

    let changed = patch.changed_fields();
    info!(tenant_id = %tenant_id, changed = ?changed, "Tenant updated");
    record_activity(
        db,
        actor,
        ActivityAction::TenantUpdate,
        tenant_id,
        json!({ "tenantName": tenant.name, "changedFields": changed }),
    )
    .await;

    Ok(tenant)
}

/// Tenant the caller is currently acting as
pub fn current_tenant_id(sessions: &TenantSessions, actor: &AuthUser) -> Uuid {
    if actor.is_super_admin() {
        sessions.current(actor.user_id).unwrap_or(actor.tenant_id)
    } else {
        actor.tenant_id
    }
}

pub async fn current(
    db: &DbService,
    sessions: &TenantSessions,
    actor: &AuthUser,
) -> ServiceResult<Tenant> {
    let tenant_id = current_tenant_id(sessions, actor);
    Tenant::find_by_id(&db.pool, tenant_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Tenant not found".into()))
}

/// Point a super-admin's session at another tenant.
///
/// Returns the tenant and the context it replaced.
pub async fn switch(
    db: &DbService,
    sessions: &TenantSessions,
    actor: &AuthUser,
    tenant_id: Option<Uuid>,
) -> ServiceResult<(Tenant, Uuid)> {
    let tenant_id =
        tenant_id.ok_or_else(|| ServiceError::Validation("Tenant ID is required".into()))?;

    if !has_permission(&Permission::for_role(actor.role), Permission::TenantsSwitch) {
        return Err(ServiceError::Forbidden(
            "Only Super Admins can switch tenants".into(),
        ));
    }

    let tenant = Tenant::find_by_id(&db.pool, tenant_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Tenant not found".into()))?;

    let previous = sessions
        .switch(actor.user_id, tenant_id)
        .unwrap_or(actor.tenant_id);

    info!(
        user_id = %actor.user_id,
        from = %previous,
        to = %tenant_id,
        "Tenant context switched"
    );
    record_activity(
        db,
        actor,
        ActivityAction::TenantSwitch,
        tenant_id,
        json!({ "tenantName": tenant.name, "previousTenantId": previous }),
    )
    .await;

    Ok((tenant, previous))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Role;

    fn actor(role: Role, tenant_id: Uuid) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            tenant_id,
            email: "ops@example.com".into(),
            role,
        }
    }

    fn create_request(name: &str, domain: &str, industry: Option<&str>) -> CreateTenantRequest {
        CreateTenantRequest {
            name: name.into(),
            domain: domain.into(),
            industry: industry.map(Into::into),
            plan: None,
            is_template: None,
            parent_template: None,
        }
    }

    #[tokio::test]
    async fn test_create_logs_activity_and_rejects_duplicates() {
        let db = DbService::in_memory().await.unwrap();
        let admin = actor(Role::SuperAdmin, Uuid::new_v4());

        let tenant = create(&db, &admin, create_request("Acme", "Acme.Example", Some("legal")))
            .await
            .unwrap();
        assert_eq!(tenant.domain, "acme.example");

        let dup = create(&db, &admin, create_request("Other", "acme.example", None)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let blank = create(&db, &admin, create_request(" ", "x.example", None)).await;
        assert!(matches!(blank, Err(ServiceError::Validation(_))));

        let log = ActivityLog::find_by_entity(&db.pool, TENANT_ENTITY, tenant.id)
            .await
            .unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action_type, ActivityAction::TenantCreate);
        assert_eq!(log[0].user_id, admin.user_id);
    }

    #[tokio::test]
    async fn test_update_records_changed_fields() {
        let db = DbService::in_memory().await.unwrap();
        let admin = actor(Role::SuperAdmin, Uuid::new_v4());
        let tenant = create(&db, &admin, create_request("Acme", "acme.example", None))
            .await
            .unwrap();

        let updated = update(
            &db,
            &admin,
            tenant.id,
            UpdateTenantRequest {
                status: Some("suspended".into()),
                industry: Some("retail".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, TenantStatus::Suspended);

        let log = ActivityLog::find_by_entity(&db.pool, TENANT_ENTITY, tenant.id)
            .await
            .unwrap();
        assert_eq!(log[0].action_type, ActivityAction::TenantUpdate);
        assert_eq!(
            log[0].details.0["changedFields"],
            serde_json::json!(["industry", "status"])
        );

        let bad_status = update(
            &db,
            &admin,
            tenant.id,
            UpdateTenantRequest {
                status: Some("deleted".into()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_status, Err(ServiceError::Validation(_))));

        let missing = update(&db, &admin, Uuid::new_v4(), UpdateTenantRequest::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let db = DbService::in_memory().await.unwrap();
        let admin = actor(Role::SuperAdmin, Uuid::new_v4());

        let a = create(&db, &admin, create_request("A", "a.example", Some("legal"))).await.unwrap();
        create(&db, &admin, create_request("B", "b.example", Some("legal"))).await.unwrap();
        create(
            &db,
            &admin,
            CreateTenantRequest {
                is_template: Some(true),
                ..create_request("T", "t.example", None)
            },
        )
        .await
        .unwrap();
        update(
            &db,
            &admin,
            a.id,
            UpdateTenantRequest {
                status: Some("inactive".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stats = overview(&db).await.unwrap();
        assert_eq!(stats.total_tenants, 3);
        assert_eq!(stats.active_tenants, 2);
        assert_eq!(stats.inactive_tenants, 1);
        assert_eq!(stats.suspended_tenants, 0);
        assert_eq!(stats.template_tenants, 1);
        assert_eq!(stats.tenants_by_industry.get("legal"), Some(&2));
        assert_eq!(stats.tenants_by_industry.len(), 1);
    }

    #[tokio::test]
    async fn test_switch_rules() {
        let db = DbService::in_memory().await.unwrap();
        let sessions = TenantSessions::default();
        let home = Uuid::new_v4();
        let admin = actor(Role::SuperAdmin, home);
        let target = create(&db, &admin, create_request("T", "t.example", None)).await.unwrap();

        assert!(matches!(
            switch(&db, &sessions, &admin, None).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            switch(&db, &sessions, &actor(Role::Admin, home), Some(target.id)).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            switch(&db, &sessions, &admin, Some(Uuid::new_v4())).await,
            Err(ServiceError::NotFound(_))
        ));

        let (tenant, previous) = switch(&db, &sessions, &admin, Some(target.id)).await.unwrap();
        assert_eq!(tenant.id, target.id);
        assert_eq!(previous, home);
        assert_eq!(current_tenant_id(&sessions, &admin), target.id);

        let log = ActivityLog::find_by_entity(&db.pool, TENANT_ENTITY, target.id)
            .await
            .unwrap();
        assert_eq!(log[0].action_type, ActivityAction::TenantSwitch);
        assert_eq!(log[0].details.0["previousTenantId"], home.to_string());
    }
}
