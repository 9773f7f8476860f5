use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::roles::models::Role;
use crate::features::roles::services::access_service::OwnerKind;

/// Role offered at registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailableRoleDto {
    pub role: Role,
    pub label: String,
    pub description: String,
    /// Human-readable summary of what the role can do
    pub capabilities: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentRoleDto {
    pub role: Role,
    pub level: u8,
    pub is_active: bool,
    pub permissions: Vec<String>,
    pub can_upgrade: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_profile_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RolePermissionsDto {
    pub role: Role,
    pub level: u8,
    /// Version of the permission table in effect
    pub version: u32,
    pub permissions: Vec<String>,
    /// Whether the caller is at least as privileged as this role
    pub within_caller_level: bool,
}

/// Query params for checking the caller's permissions
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PermissionCheckQuery {
    /// Action such as `create` or `read:own`
    pub action: String,
    /// Resource such as `products`; without it the action is the whole token
    pub resource: Option<String>,
    /// Owner of the target resource, for ownership checks
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub owner_kind: OwnerKind,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PermissionCheckDto {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub allowed: bool,
    /// Present when an owner was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owns_resource: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleUpgradeDto {
    pub current_role: Role,
    pub target_role: Role,
    pub next_steps: Vec<String>,
}
