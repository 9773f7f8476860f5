use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::guards::RequireCustomer;
use crate::features::roles::dtos::*;
use crate::features::roles::services::RoleService;
use crate::shared::types::ApiResponse;

/// Roles available at registration
#[utoipa::path(
    get,
    path = "/api/roles/available",
    responses(
        (status = 200, description = "Available roles", body = ApiResponse<Vec<AvailableRoleDto>>)
    ),
    tag = "roles"
)]
pub async fn get_available_roles(
    State(service): State<Arc<RoleService>>,
) -> Json<ApiResponse<Vec<AvailableRoleDto>>> {
    Json(ApiResponse::success(
        Some(service.available_roles()),
        Some("Available user roles retrieved successfully".to_string()),
        None,
    ))
}

/// Role information for the authenticated user
#[utoipa::path(
    get,
    path = "/api/roles/current",
    responses(
        (status = 200, description = "Current role", body = ApiResponse<CurrentRoleDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "roles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_role(
    RequireCustomer(user): RequireCustomer,
    State(service): State<Arc<RoleService>>,
) -> Json<ApiResponse<CurrentRoleDto>> {
    Json(ApiResponse::success(Some(service.current(&user)), None, None))
}

/// Check whether the caller holds a permission and, optionally, owns a resource
#[utoipa::path(
    get,
    path = "/api/roles/permissions",
    params(PermissionCheckQuery),
    responses(
        (status = 200, description = "Permission check result", body = ApiResponse<PermissionCheckDto>),
        (status = 400, description = "Action is required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "roles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_permission(
    RequireCustomer(user): RequireCustomer,
    State(service): State<Arc<RoleService>>,
    Query(query): Query<PermissionCheckQuery>,
) -> Result<Json<ApiResponse<PermissionCheckDto>>> {
    let result = service.check(&user, query)?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Permission set granted to a role
#[utoipa::path(
    get,
    path = "/api/roles/{role}/permissions",
    params(
        ("role" = String, Path, description = "customer, vendor or admin")
    ),
    responses(
        (status = 200, description = "Role permissions", body = ApiResponse<RolePermissionsDto>),
        (status = 400, description = "Invalid role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "roles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_role_permissions(
    RequireCustomer(user): RequireCustomer,
    State(service): State<Arc<RoleService>>,
    Path(role): Path<String>,
) -> Result<Json<ApiResponse<RolePermissionsDto>>> {
    let permissions = service.permissions_of(&user, &role)?;
    Ok(Json(ApiResponse::success(Some(permissions), None, None)))
}

/// Start the customer to vendor upgrade
#[utoipa::path(
    post,
    path = "/api/roles/upgrade",
    responses(
        (status = 200, description = "Upgrade available", body = ApiResponse<RoleUpgradeDto>),
        (status = 400, description = "Upgrade not available for this account"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "roles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn request_role_upgrade(
    RequireCustomer(user): RequireCustomer,
    State(service): State<Arc<RoleService>>,
) -> Result<Json<ApiResponse<RoleUpgradeDto>>> {
    let upgrade = service.request_upgrade(&user)?;
    Ok(Json(ApiResponse::success(
        Some(upgrade),
        Some("Role upgrade available".to_string()),
        None,
    )))
}
