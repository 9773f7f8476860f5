use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers, models as categories_models};
use crate::features::roles::{dtos as roles_dtos, handlers as roles_handlers, models as roles_models};
use crate::features::roles::services::access_service::OwnerKind;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category_tree,
        categories_handlers::get_featured_categories,
        categories_handlers::get_navigation_categories,
        categories_handlers::get_footer_categories,
        categories_handlers::search_categories,
        categories_handlers::get_category,
        categories_handlers::get_category_ancestors,
        categories_handlers::get_category_children,
        categories_handlers::get_category_siblings,
        categories_handlers::get_category_breadcrumb,
        // Categories (admin)
        categories_handlers::admin_list_categories,
        categories_handlers::create_category,
        categories_handlers::admin_get_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::get_category_descendants,
        // Roles
        roles_handlers::get_available_roles,
        roles_handlers::get_current_role,
        roles_handlers::check_permission,
        roles_handlers::get_role_permissions,
        roles_handlers::request_role_upgrade,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Categories
            categories_models::CategoryAttribute,
            categories_models::AttributeType,
            categories_models::AttributeOption,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::BreadcrumbItemDto,
            categories_dtos::CategoryDetailsDto,
            categories_dtos::DeleteCategoryResponseDto,
            categories_dtos::ChildPolicy,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            ApiResponse<Vec<categories_dtos::BreadcrumbItemDto>>,
            ApiResponse<categories_dtos::CategoryDetailsDto>,
            ApiResponse<categories_dtos::DeleteCategoryResponseDto>,
            // Roles
            roles_models::Role,
            OwnerKind,
            roles_dtos::AvailableRoleDto,
            roles_dtos::CurrentRoleDto,
            roles_dtos::RolePermissionsDto,
            roles_dtos::PermissionCheckDto,
            roles_dtos::RoleUpgradeDto,
            ApiResponse<Vec<roles_dtos::AvailableRoleDto>>,
            ApiResponse<roles_dtos::CurrentRoleDto>,
            ApiResponse<roles_dtos::RolePermissionsDto>,
            ApiResponse<roles_dtos::PermissionCheckDto>,
            ApiResponse<roles_dtos::RoleUpgradeDto>,
        )
    ),
    tags(
        (name = "categories", description = "Storefront category hierarchy (public)"),
        (name = "admin-categories", description = "Category administration (admin only)"),
        (name = "roles", description = "Roles and permission checks"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace Core API",
        version = "0.1.0",
        description = "Category hierarchy and role-based access for the marketplace",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_category_and_role_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/categories/tree",
            "/api/categories/{id}/breadcrumb",
            "/api/admin/categories/{id}",
            "/api/roles/{role}/permissions",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Catalog".to_string(),
            version: "2.0.0".to_string(),
            description: "Staging".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Catalog");
        assert_eq!(doc.info.description.as_deref(), Some("Staging"));
    }
}
