use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::roles::models::Role;

/// Caller identity resolved from a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
    pub is_active: bool,
    /// Linked vendor profile, present for vendors that completed registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_profile_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: String,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
    #[serde(rename = "vendorProfile", default, skip_serializing_if = "Option::is_none")]
    pub vendor_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: u64,
}

fn default_active() -> bool {
    true
}
