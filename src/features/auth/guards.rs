//! Role-based authorization guards for the application.
//!
//! Each guard extracts the authenticated caller, rejects deactivated accounts
//! and then checks the caller's role against the guard's allowed list:
//! - `RequireAdmin`: admin
//! - `RequireCustomer`: customer, vendor, admin

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::roles::models::Role;
use crate::features::roles::services::access_service::{authorize, require_active};

const ADMIN_ROLES: &[Role] = &[Role::Admin];
const CUSTOMER_ROLES: &[Role] = &[Role::Customer, Role::Vendor, Role::Admin];

fn guard(parts: &Parts, allowed: &[Role]) -> Result<AuthenticatedUser, AppError> {
    let caller = parts.extensions.get::<AuthenticatedUser>();
    let caller = require_active(caller)?;
    Ok(authorize(Some(caller), allowed)?.clone())
}

/// Guard for catalog administration and vendor moderation.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, ADMIN_ROLES).map(RequireAdmin)
    }
}

/// Guard for any active account.
pub struct RequireCustomer(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, CUSTOMER_ROLES).map(RequireCustomer)
    }
}
