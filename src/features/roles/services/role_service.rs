use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::roles::dtos::*;
use crate::features::roles::models::{PermissionTable, Role};
use crate::features::roles::services::access_service::{
    authorize_own_resource, can_access_level, role_level, user_has_role, ResourceOwner,
};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Read-only views over the permission table for the caller
pub struct RoleService {
    table: Arc<PermissionTable>,
}

impl RoleService {
    pub fn new(table: Arc<PermissionTable>) -> Self {
        Self { table }
    }

    /// Roles a new account may register with. Admins are provisioned separately.
    pub fn available_roles(&self) -> Vec<AvailableRoleDto> {
        vec![
            AvailableRoleDto {
                role: Role::Customer,
                label: "Customer".to_string(),
                description: "Browse and purchase products from vendors".to_string(),
                capabilities: lines(&[
                    "Browse products",
                    "Add items to cart",
                    "Place orders",
                    "Write reviews",
                    "Manage personal profile",
                ]),
                requirements: Vec::new(),
            },
            AvailableRoleDto {
                role: Role::Vendor,
                label: "Vendor/Seller".to_string(),
                description: "Sell products and manage your online store".to_string(),
                capabilities: lines(&[
                    "Create and manage products",
                    "Manage inventory",
                    "Process orders",
                    "View sales analytics",
                    "Manage store profile",
                ]),
                requirements: lines(&[
                    "Valid business registration",
                    "Bank account details",
                    "Address verification",
                ]),
            },
        ]
    }

    pub fn current(&self, user: &AuthenticatedUser) -> CurrentRoleDto {
        CurrentRoleDto {
            role: user.role,
            level: role_level(user.role),
            is_active: user.is_active,
            permissions: self.table.permissions_for(user.role).to_vec(),
            can_upgrade: user.role.upgrade_target().is_some(),
            vendor_profile_id: user.vendor_profile_id,
        }
    }

    pub fn permissions_of(&self, user: &AuthenticatedUser, role: &str) -> Result<RolePermissionsDto> {
        let role: Role = role.parse()?;
        Ok(RolePermissionsDto {
            role,
            level: role_level(role),
            version: self.table.version,
            permissions: self.table.permissions_for(role).to_vec(),
            within_caller_level: can_access_level(Some(user), role),
        })
    }

    pub fn check(&self, user: &AuthenticatedUser, query: PermissionCheckQuery) -> Result<PermissionCheckDto> {
        let action = query.action.trim();
        if action.is_empty() {
            return Err(AppError::Validation("Action is required".to_string()));
        }
        let resource = query
            .resource
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let allowed = self.table.has_permission(user, action, resource.as_deref());
        let owns_resource = query.owner_id.map(|id| {
            let owner = ResourceOwner::new(query.owner_kind, id);
            authorize_own_resource(Some(user), owner, &Role::ALL).is_ok()
        });

        tracing::debug!(
            "Permission check: user={}, action={}, resource={:?}, allowed={}",
            user.id,
            action,
            resource,
            allowed
        );

        Ok(PermissionCheckDto {
            action: action.to_string(),
            resource,
            allowed,
            owns_resource,
        })
    }

    /// Only customers without a vendor application may start the upgrade
    pub fn request_upgrade(&self, user: &AuthenticatedUser) -> Result<RoleUpgradeDto> {
        let target_role = user
            .role
            .upgrade_target()
            .filter(|_| user_has_role(Some(user), &[Role::Customer]))
            .ok_or_else(|| {
                AppError::BadRequest("Role upgrade only available for customers".to_string())
            })?;

        if user.vendor_profile_id.is_some() {
            return Err(AppError::BadRequest(
                "Vendor registration already in progress".to_string(),
            ));
        }

        Ok(RoleUpgradeDto {
            current_role: user.role,
            target_role,
            next_steps: lines(&[
                "Complete vendor registration form",
                "Upload required business documents",
                "Provide bank account details",
                "Wait for admin verification",
            ]),
        })
    }
}
