//! Bearer token authentication

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::permissions::{has_permission, Permission, Role};
use crate::{error::ApiError, state::AppState};

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

/// HS256 signing and verification keys
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }
}

/// Mint a token for a user
pub fn issue_token(
    keys: &JwtKeys,
    user_id: Uuid,
    tenant_id: Uuid,
    email: &str,
    role: Role,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        tenant_id,
        email: email.to_string(),
        role: role.as_str().to_string(),
        exp: (Utc::now() + keys.ttl).timestamp() as usize,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
}

/// Check signature and expiry
pub fn verify_token(keys: &JwtKeys, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))?;
    Ok(data.claims)
}

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// Tenant the token was issued for
    pub tenant_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Reject with 403 unless the caller's role grants `permission`
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if has_permission(&Permission::for_role(self.role), permission) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Role {} may not perform this action",
                self.role.as_str()
            )))
        }
    }

    /// Reject with 403 when acting on another tenant, unless super-admin
    pub fn ensure_tenant_access(&self, tenant_id: Uuid) -> Result<(), ApiError> {
        if self.is_super_admin() || self.tenant_id == tenant_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You do not have access to this tenant".into(),
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?;

        let claims = verify_token(&state.auth, token.trim()).map_err(|e| {
            debug!(error = %e, "Token rejected");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| ApiError::Unauthorized(format!("Unrecognised role {}", claims.role)))?;

        Ok(AuthUser {
            user_id: claims.sub,
            tenant_id: claims.tenant_id,
            email: claims.email,
            role,
        })
    }
}
