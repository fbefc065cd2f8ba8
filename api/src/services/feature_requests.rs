//! Feature request screening and history

use smartsite_db::models::feature_request::{FeatureRequestRecord, NewFeatureRequest};
use smartsite_db::models::tenant::Tenant;
use smartsite_db::DbService;
use smartsite_screening::{FeatureScreener, ScreeningOutcome};
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};

/// Screen a request on behalf of `tenant_id` and store the decision
pub async fn submit(
    db: &DbService,
    screener: &FeatureScreener,
    tenant_id: Uuid,
    description: &str,
) -> ServiceResult<(FeatureRequestRecord, ScreeningOutcome)> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ServiceError::Validation("Description is required".into()));
    }

    if !Tenant::exists(&db.pool, tenant_id).await? {
        return Err(ServiceError::NotFound("Tenant not found".into()));
    }

    let mut outcome = screener.assess(description).await;

    // Stored before any wishlist forward, so every external item has a row
    let mut record = FeatureRequestRecord::create(
        &db.pool,
        &NewFeatureRequest {
            tenant_id,
            description: description.to_string(),
            category: outcome.category.as_str().to_string(),
            matched_module: outcome.matched_module.clone(),
            request_kind: outcome.request_kind.map(|k| k.as_str().to_string()),
            sent_to_dev: outcome.should_submit_to_dev,
            wishlist_submitted: false,
            classifier_error: outcome.classifier_error.clone(),
        },
    )
    .await?;

    if screener
        .forward_wishlist(&tenant_id.to_string(), description, &outcome)
        .await
    {
        outcome.wishlist_submitted = true;
        match FeatureRequestRecord::mark_wishlist_submitted(&db.pool, record.id).await {
            Ok(()) => record.wishlist_submitted = true,
            Err(e) => warn!(error = %e, request_id = %record.id, "Failed to mark wishlist submission"),
        }
    }

    info!(
        tenant_id = %tenant_id,
        request_id = %record.id,
        category = %outcome.category,
        "Feature request screened"
    );

    Ok((record, outcome))
}

pub async fn list(db: &DbService, tenant_id: Uuid) -> ServiceResult<Vec<FeatureRequestRecord>> {
    Ok(FeatureRequestRecord::find_by_tenant(&db.pool, tenant_id).await?)
}
