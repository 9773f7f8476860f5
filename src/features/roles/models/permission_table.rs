use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::features::auth::model::AuthenticatedUser;
use crate::features::roles::models::Role;

/// Role -> permission token table, built once at startup and shared read-only.
///
/// Tokens have the form `resource:action` (optionally with a scope suffix such
/// as `orders:read:own`) or `resource:*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTable {
    pub version: u32,
    pub roles: BTreeMap<Role, Vec<String>>,
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PermissionTable {
    pub const BUILTIN_VERSION: u32 = 1;

    pub fn builtin() -> Self {
        let grant = |tokens: &[&str]| tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        let mut roles = BTreeMap::new();
        roles.insert(
            Role::Customer,
            grant(&[
                "products:read",
                "cart:manage",
                "orders:create",
                "orders:read:own",
                "reviews:create",
                "profile:manage:own",
            ]),
        );
        roles.insert(
            Role::Vendor,
            grant(&[
                "products:create",
                "products:manage:own",
                "orders:read:own",
                "analytics:read:own",
                "store:manage:own",
                "inventory:manage:own",
            ]),
        );
        roles.insert(
            Role::Admin,
            grant(&[
                "users:manage",
                "vendors:manage",
                "products:manage:all",
                "categories:manage",
                "orders:manage:all",
                "analytics:read:all",
                "system:manage",
            ]),
        );

        Self {
            version: Self::BUILTIN_VERSION,
            roles,
        }
    }

    /// Load a table from a JSON file of the form `{"version": 2, "roles": {"customer": [...], ...}}`
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        let table: PermissionTable =
            serde_json::from_str(raw).map_err(|e| format!("Invalid permission table: {}", e))?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), String> {
        if self.version == 0 {
            return Err("Permission table version must be greater than 0".to_string());
        }
        if let Some(missing) = Role::ALL.iter().find(|r| !self.roles.contains_key(r)) {
            return Err(format!("Permission table has no entry for role '{}'", missing));
        }
        for (role, tokens) in &self.roles {
            if let Some(bad) = tokens
                .iter()
                .find(|t| t.is_empty() || t.starts_with(':') || t.ends_with(':'))
            {
                return Err(format!("Malformed permission '{}' for role '{}'", bad, role));
            }
        }
        Ok(())
    }

    pub fn permissions_for(&self, role: Role) -> &[String] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact `resource:action` or `resource:*` grant. Without a resource the
    /// action is the token and `action:*` is the wildcard. Admins pass every
    /// check; inactive callers pass none.
    pub fn has_permission(
        &self,
        caller: &AuthenticatedUser,
        action: &str,
        resource: Option<&str>,
    ) -> bool {
        if !caller.is_active {
            return false;
        }

        let granted = self.permissions_for(caller.role);
        let (exact, wildcard) = match resource {
            Some(resource) => (format!("{}:{}", resource, action), format!("{}:*", resource)),
            None => (action.to_string(), format!("{}:*", action)),
        };

        granted.iter().any(|p| *p == exact || *p == wildcard) || caller.is_admin()
    }
}
