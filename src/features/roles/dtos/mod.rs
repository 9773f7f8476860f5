pub mod role_dto;

pub use role_dto::*;
