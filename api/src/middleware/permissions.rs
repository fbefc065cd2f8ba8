//! Roles and the permissions they grant

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator, may act on every tenant
    SuperAdmin,
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(other.to_string()),
        }
    }
}

/// Fine-grained permission checked by handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // Site variants
    SiteVariantsRead,
    SiteVariantsWrite,

    // Feature requests
    FeatureRequestsRead,
    FeatureRequestsWrite,

    // Tenants
    TenantsRead,
    TenantsManage,
    TenantsSwitch,

    // Everything
    Admin,
}

impl Permission {
    /// Permissions granted to a role
    pub fn for_role(role: Role) -> HashSet<Permission> {
        match role {
            Role::SuperAdmin => Self::all(),
            Role::Admin => Self::admin(),
            Role::Editor => Self::editor(),
            Role::Viewer => Self::viewer(),
        }
    }

    fn all() -> HashSet<Permission> {
        use Permission::*;
        [
            SiteVariantsRead, SiteVariantsWrite,
            FeatureRequestsRead, FeatureRequestsWrite,
            TenantsRead, TenantsManage, TenantsSwitch,
            Admin,
        ]
        .into_iter()
        .collect()
    }

    fn admin() -> HashSet<Permission> {
        use Permission::*;
        [
            SiteVariantsRead, SiteVariantsWrite,
            FeatureRequestsRead, FeatureRequestsWrite,
        ]
        .into_iter()
        .collect()
    }

    fn editor() -> HashSet<Permission> {
        use Permission::*;
        [SiteVariantsRead, FeatureRequestsRead, FeatureRequestsWrite]
            .into_iter()
            .collect()
    }

    fn viewer() -> HashSet<Permission> {
        use Permission::*;
        [SiteVariantsRead, FeatureRequestsRead].into_iter().collect()
    }
}

/// Check if a set of permissions allows an action
pub fn has_permission(permissions: &HashSet<Permission>, required: Permission) -> bool {
    permissions.contains(&Permission::Admin) || permissions.contains(&required)
}
