pub mod access_service;
pub mod role_service;

pub use role_service::RoleService;
