pub mod permission_table;
pub mod role;

pub use permission_table::PermissionTable;
pub use role::Role;
