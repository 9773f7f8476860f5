use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::dtos::*;
use crate::features::categories::models::Category;
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Wrap a list of records in the response envelope with its count
pub(crate) fn category_list(
    categories: Vec<Category>,
    message: &str,
) -> Json<ApiResponse<Vec<CategoryResponseDto>>> {
    let total = categories.len() as i64;
    let items: Vec<CategoryResponseDto> = categories.into_iter().map(Into::into).collect();
    Json(ApiResponse::success(
        Some(items),
        Some(message.to_string()),
        Some(Meta { total }),
    ))
}

/// List active and visible categories
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list(&query, false).await?;
    Ok(category_list(categories, "Categories retrieved successfully"))
}

/// Nested category tree for storefront menus
#[utoipa::path(
    get,
    path = "/api/categories/tree",
    params(TreeQuery),
    responses(
        (status = 200, description = "Category tree", body = ApiResponse<Vec<CategoryTreeDto>>),
        (status = 404, description = "Root category not found")
    ),
    tag = "categories"
)]
pub async fn get_category_tree(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<TreeQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryTreeDto>>>> {
    let tree = service.build_tree(query.root_id).await?;
    Ok(Json(ApiResponse::success(
        Some(tree),
        Some("Category tree retrieved successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/categories/featured",
    params(FeaturedQuery),
    responses(
        (status = 200, description = "Featured categories", body = ApiResponse<Vec<CategoryResponseDto>>)
    ),
    tag = "categories"
)]
pub async fn get_featured_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.find_featured(query.limit).await?;
    Ok(category_list(categories, "Featured categories retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/api/categories/navigation",
    responses(
        (status = 200, description = "Navigation categories", body = ApiResponse<Vec<CategoryResponseDto>>)
    ),
    tag = "categories"
)]
pub async fn get_navigation_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.find_for_navigation().await?;
    Ok(category_list(categories, "Navigation categories retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/api/categories/footer",
    responses(
        (status = 200, description = "Footer categories", body = ApiResponse<Vec<CategoryResponseDto>>)
    ),
    tag = "categories"
)]
pub async fn get_footer_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.find_for_footer().await?;
    Ok(category_list(categories, "Footer categories retrieved successfully"))
}

/// Search categories by name or description
#[utoipa::path(
    get,
    path = "/api/categories/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching categories", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 400, description = "Search query is required")
    ),
    tag = "categories"
)]
pub async fn search_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.search(&query.q, query.limit).await?;
    Ok(category_list(categories, "Search results retrieved successfully"))
}

/// Get category by id or slug, with ancestors, children and breadcrumb
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = String, Path, description = "Category id or slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailsDto>),
        (status = 404, description = "Category not found or not public")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(identifier): Path<String>,
) -> Result<Json<ApiResponse<CategoryDetailsDto>>> {
    let details = service.details(&identifier, true).await?;
    Ok(Json(ApiResponse::success(
        Some(details),
        Some("Category retrieved successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/ancestors",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Ancestors, root first", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 404, description = "Category not found or not public")
    ),
    tag = "categories"
)]
pub async fn get_category_ancestors(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let ancestors = service.get_ancestors(id, true).await?;
    Ok(category_list(ancestors, "Ancestors retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/children",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Active direct children", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 404, description = "Category not found or not public")
    ),
    tag = "categories"
)]
pub async fn get_category_children(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let children = service.get_children(id, true).await?;
    Ok(category_list(children, "Children retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/siblings",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Active siblings", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 404, description = "Category not found or not public")
    ),
    tag = "categories"
)]
pub async fn get_category_siblings(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let siblings = service.get_siblings(id, true).await?;
    Ok(category_list(siblings, "Siblings retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/breadcrumb",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Breadcrumb, root first", body = ApiResponse<Vec<BreadcrumbItemDto>>),
        (status = 404, description = "Category not found or not public")
    ),
    tag = "categories"
)]
pub async fn get_category_breadcrumb(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<BreadcrumbItemDto>>>> {
    let breadcrumb = service.build_breadcrumb(id, true).await?;
    Ok(Json(ApiResponse::success(Some(breadcrumb), None, None)))
}
