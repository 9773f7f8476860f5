use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::roles::error::AccessError;

/// Marketplace role. Declaration order is the privilege order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Vendor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Vendor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    /// Integer rank used for "at least this privileged" checks
    pub fn level(&self) -> u8 {
        match self {
            Role::Customer => 1,
            Role::Vendor => 2,
            Role::Admin => 3,
        }
    }

    /// Only customers may request the vendor role
    pub fn upgrade_target(&self) -> Option<Role> {
        match self {
            Role::Customer => Some(Role::Vendor),
            Role::Vendor | Role::Admin => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "vendor" => Ok(Role::Vendor),
            "admin" => Ok(Role::Admin),
            _ => Err(AccessError::InvalidRole(s.to_string())),
        }
    }
}
