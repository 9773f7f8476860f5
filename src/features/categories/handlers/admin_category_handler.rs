use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::category_handler::category_list;
use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::categories::dtos::*;
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List categories, including hidden and inactive ones with `include_inactive`
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_categories(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list(&query, true).await?;
    Ok(category_list(categories, "Categories retrieved successfully"))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error, missing parent or depth exceeded"),
        (status = 409, description = "Category name already exists")
    ),
    tag = "admin-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service.create(dto, Some(user.id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category.into()),
            Some("Category created successfully".to_string()),
            None,
        )),
    ))
}

/// Get any category by id or slug, regardless of visibility
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = String, Path, description = "Category id or slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailsDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_get_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(identifier): Path<String>,
) -> Result<Json<ApiResponse<CategoryDetailsDto>>> {
    let details = service.details(&identifier, false).await?;
    Ok(Json(ApiResponse::success(Some(details), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error, circular reference or depth exceeded"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already exists")
    ),
    tag = "admin-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_category(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update(id, dto, Some(user.id)).await?;
    Ok(Json(ApiResponse::success(
        Some(category.into()),
        Some("Category updated successfully".to_string()),
        None,
    )))
}

/// Delete a category, moving its children up one level or deleting the subtree
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        DeleteCategoryQuery
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<DeleteCategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteCategoryQuery>,
) -> Result<Json<ApiResponse<DeleteCategoryResponseDto>>> {
    let outcome = service.delete(id, query.handle_children).await?;
    Ok(Json(ApiResponse::success(
        Some(outcome),
        Some("Category deleted successfully".to_string()),
        None,
    )))
}

/// All descendants depth-first, including inactive ones
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}/descendants",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Descendants", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_category_descendants(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let descendants = service.get_descendants(id).await?;
    Ok(category_list(descendants, "Descendants retrieved successfully"))
}
