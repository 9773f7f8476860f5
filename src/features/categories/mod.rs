//! Category Hierarchy Manager.
//!
//! Categories form a tree of at most four levels (0 to 3). Each record keeps
//! its parent as an id plus derived fields: a globally unique slug, its level
//! and a materialized path of ancestor names.

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod slug;
pub mod store;

pub use services::CategoryService;
pub use store::{CategoryStore, InMemoryCategoryStore, PgCategoryStore};
