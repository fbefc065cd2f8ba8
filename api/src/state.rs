//! Shared application state

use std::collections::HashMap;

use parking_lot::RwLock;
use smartsite_db::DbService;
use smartsite_screening::FeatureScreener;
use uuid::Uuid;

use crate::middleware::auth::JwtKeys;

/// Everything handlers need, shared behind an `Arc`
pub struct AppState {
    pub db: DbService,
    pub auth: JwtKeys,
    pub sessions: TenantSessions,
    pub screener: FeatureScreener,
}

impl AppState {
    pub fn new(db: DbService, auth: JwtKeys, screener: FeatureScreener) -> Self {
        Self {
            db,
            auth,
            sessions: TenantSessions::default(),
            screener,
        }
    }
}

/// Tenant context chosen by each super-admin, keyed by user id.
///
/// Process-local; contexts reset on restart.
#[derive(Debug, Default)]
pub struct TenantSessions {
    current: RwLock<HashMap<Uuid, Uuid>>,
}

impl TenantSessions {
    pub fn current(&self, user_id: Uuid) -> Option<Uuid> {
        self.current.read().get(&user_id).copied()
    }

    /// Set the user's tenant context, returning the one it replaces
    pub fn switch(&self, user_id: Uuid, tenant_id: Uuid) -> Option<Uuid> {
        self.current.write().insert(user_id, tenant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_returns_previous_context() {
        let sessions = TenantSessions::default();
        let user = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(sessions.current(user), None);
        assert_eq!(sessions.switch(user, a), None);
        assert_eq!(sessions.switch(user, b), Some(a));
        assert_eq!(sessions.current(user), Some(b));
        assert_eq!(sessions.current(Uuid::new_v4()), None);
    }
}
