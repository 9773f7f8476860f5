use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::core::middleware::audit_access;
use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Storefront category routes (no authentication required)
pub fn public_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/tree", get(handlers::get_category_tree))
        .route("/api/categories/featured", get(handlers::get_featured_categories))
        .route("/api/categories/navigation", get(handlers::get_navigation_categories))
        .route("/api/categories/footer", get(handlers::get_footer_categories))
        .route("/api/categories/search", get(handlers::search_categories))
        .route("/api/categories/{id}", get(handlers::get_category))
        .route("/api/categories/{id}/ancestors", get(handlers::get_category_ancestors))
        .route("/api/categories/{id}/children", get(handlers::get_category_children))
        .route("/api/categories/{id}/siblings", get(handlers::get_category_siblings))
        .route("/api/categories/{id}/breadcrumb", get(handlers::get_category_breadcrumb))
        .with_state(service)
}

/// Category administration, nested under `/api/admin`
///
/// Expects the JWT middleware to run first; every handler also checks the admin role.
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::admin_list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::admin_get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/categories/{id}/descendants",
            get(handlers::get_category_descendants),
        )
        .route_layer(from_fn_with_state("categories", audit_access))
        .with_state(service)
}
