//! Role checks consumed by the routing layer before a request reaches a handler.
//!
//! Every check is a pure function of the caller and its arguments. The admin
//! bypass is applied per check: [`authorize_own_resource`] lets admins through,
//! [`authorize`] only does so when `admin` is in the allowed list.

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::roles::error::AccessError;
use crate::features::roles::models::Role;

/// Declared owner of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOwner {
    /// Owned by a user account (orders, profile, cart)
    User(Uuid),
    /// Owned by a vendor profile (store, products, inventory)
    Vendor(Uuid),
}

/// Which identity an ownership check compares against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    #[default]
    User,
    Vendor,
}

impl ResourceOwner {
    pub fn new(kind: OwnerKind, id: Uuid) -> Self {
        match kind {
            OwnerKind::User => ResourceOwner::User(id),
            OwnerKind::Vendor => ResourceOwner::Vendor(id),
        }
    }
}

/// Fails with `Unauthenticated` without a caller and `Forbidden` when the
/// caller's role is not listed. An empty list admits any authenticated caller.
pub fn authorize<'a>(
    caller: Option<&'a AuthenticatedUser>,
    allowed: &[Role],
) -> Result<&'a AuthenticatedUser, AccessError> {
    let caller = caller.ok_or(AccessError::Unauthenticated)?;

    if !allowed.is_empty() && !allowed.contains(&caller.role) {
        return Err(AccessError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    Ok(caller)
}

/// Admins always pass. Everyone else needs an allowed role and must own the
/// resource, either directly or through their vendor profile.
pub fn authorize_own_resource<'a>(
    caller: Option<&'a AuthenticatedUser>,
    owner: ResourceOwner,
    allowed: &[Role],
) -> Result<&'a AuthenticatedUser, AccessError> {
    let caller = caller.ok_or(AccessError::Unauthenticated)?;

    if caller.is_admin() {
        return Ok(caller);
    }

    let caller = authorize(Some(caller), allowed)?;

    let owns = match owner {
        ResourceOwner::User(id) => caller.id == id,
        ResourceOwner::Vendor(id) => caller.vendor_profile_id == Some(id),
    };

    if !owns {
        return Err(AccessError::Forbidden(
            "Access denied to this resource".to_string(),
        ));
    }

    Ok(caller)
}

pub fn require_active(caller: Option<&AuthenticatedUser>) -> Result<&AuthenticatedUser, AccessError> {
    let caller = caller.ok_or(AccessError::Unauthenticated)?;
    if !caller.is_active {
        return Err(AccessError::InactiveAccount);
    }
    Ok(caller)
}

pub fn role_level(role: Role) -> u8 {
    role.level()
}

/// True when the caller is at least as privileged as `required`
pub fn can_access_level(caller: Option<&AuthenticatedUser>, required: Role) -> bool {
    caller.is_some_and(|c| role_level(c.role) >= role_level(required))
}

pub fn user_has_role(caller: Option<&AuthenticatedUser>, roles: &[Role]) -> bool {
    caller.is_some_and(|c| roles.contains(&c.role))
}
