use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::core::middleware::audit_access;
use crate::features::roles::handlers;
use crate::features::roles::services::RoleService;

pub fn public_routes(service: Arc<RoleService>) -> Router {
    Router::new()
        .route("/api/roles/available", get(handlers::get_available_roles))
        .with_state(service)
}

/// Routes that need an authenticated caller
pub fn protected_routes(service: Arc<RoleService>) -> Router {
    Router::new()
        .route("/api/roles/current", get(handlers::get_current_role))
        .route("/api/roles/permissions", get(handlers::check_permission))
        .route("/api/roles/upgrade", post(handlers::request_role_upgrade))
        .route("/api/roles/{role}/permissions", get(handlers::get_role_permissions))
        .route_layer(from_fn_with_state("roles", audit_access))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::features::roles::models::{PermissionTable, Role};
    use crate::shared::test_helpers::{create_user, inactive, with_user};

    fn service() -> Arc<RoleService> {
        Arc::new(RoleService::new(Arc::new(PermissionTable::builtin())))
    }

    #[tokio::test]
    async fn test_available_roles_are_public() {
        let server = TestServer::new(public_routes(service())).unwrap();
        let body = server.get("/api/roles/available").await.json::<Value>();
        assert_eq!(body["data"][0]["role"], "customer");
        assert_eq!(body["data"][1]["role"], "vendor");
    }

    #[tokio::test]
    async fn test_protected_routes_need_caller() {
        let server = TestServer::new(protected_routes(service())).unwrap();
        server
            .get("/api/roles/current")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_vendor_views() {
        let app = with_user(protected_routes(service()), create_user(Role::Vendor));
        let server = TestServer::new(app).unwrap();

        let current = server.get("/api/roles/current").await.json::<Value>();
        assert_eq!(current["data"]["role"], "vendor");
        assert_eq!(current["data"]["can_upgrade"], false);

        let check = server
            .get("/api/roles/permissions")
            .add_query_param("action", "create")
            .add_query_param("resource", "products")
            .await
            .json::<Value>();
        assert_eq!(check["data"]["allowed"], true);

        let table = server.get("/api/roles/admin/permissions").await.json::<Value>();
        assert_eq!(table["data"]["version"], 1);

        server
            .get("/api/roles/superuser/permissions")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/api/roles/upgrade")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_inactive_caller_is_forbidden() {
        let app = with_user(
            protected_routes(service()),
            inactive(create_user(Role::Vendor)),
        );
        let server = TestServer::new(app).unwrap();

        server
            .get("/api/roles/current")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/api/roles/vendor/permissions")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/api/roles/permissions")
            .add_query_param("action", "create")
            .add_query_param("resource", "products")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .post("/api/roles/upgrade")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_customer_can_request_upgrade() {
        let app = with_user(protected_routes(service()), create_user(Role::Customer));
        let server = TestServer::new(app).unwrap();
        let body = server.post("/api/roles/upgrade").await.json::<Value>();
        assert_eq!(body["data"]["target_role"], "vendor");
    }
}
