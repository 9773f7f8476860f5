//! Role & Permission Resolver.
//!
//! Maps the caller's role onto a versioned permission table and provides the
//! role and ownership checks used by the routing layer.

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use models::PermissionTable;
pub use services::RoleService;
