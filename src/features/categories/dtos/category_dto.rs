use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryAttribute};

fn default_true() -> bool {
    true
}

/// Distinguish an absent field from an explicit `null`
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    pub parent_id: Option<Uuid>,

    #[validate(length(max = 60, message = "Meta title cannot exceed 60 characters"))]
    pub meta_title: Option<String>,

    #[validate(length(max = 160, message = "Meta description cannot exceed 160 characters"))]
    pub meta_description: Option<String>,

    #[serde(default)]
    pub meta_keywords: Vec<String>,

    pub image: Option<String>,
    pub icon: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::HEX_COLOR_REGEX",
        message = "Color must be a valid hex color"
    ))]
    pub color: Option<String>,

    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub show_in_navigation: bool,
    #[serde(default)]
    pub show_in_footer: bool,

    /// Percentage; null uses the platform default
    #[validate(range(min = 0.0, max = 50.0, message = "Commission rate must be between 0 and 50"))]
    pub commission_rate: Option<f64>,

    #[serde(default)]
    pub attributes: Vec<CategoryAttribute>,
}

/// Request DTO for updating a category. Absent fields are left untouched;
/// an explicit `null` clears the nullable ones.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    /// `null` moves the category to the root level
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,

    #[validate(length(max = 60, message = "Meta title cannot exceed 60 characters"))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub meta_title: Option<Option<String>>,

    #[validate(length(max = 160, message = "Meta description cannot exceed 160 characters"))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub meta_description: Option<Option<String>>,

    pub meta_keywords: Option<Vec<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub icon: Option<Option<String>>,

    #[validate(regex(
        path = "*crate::shared::validation::HEX_COLOR_REGEX",
        message = "Color must be a valid hex color"
    ))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,

    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_visible: Option<bool>,
    pub display_order: Option<i32>,
    pub show_in_navigation: Option<bool>,
    pub show_in_footer: Option<bool>,

    /// `null` falls back to the platform default rate
    #[validate(range(min = 0.0, max = 50.0, message = "Commission rate must be between 0 and 50"))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub commission_rate: Option<Option<f64>>,

    pub attributes: Option<Vec<CategoryAttribute>>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub level: i32,
    pub path: String,
    pub full_path: String,
    pub url: String,
    pub is_root: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Vec<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_visible: bool,
    pub display_order: i32,
    pub show_in_navigation: bool,
    pub show_in_footer: bool,
    pub product_count: i32,
    pub total_products: i32,
    pub commission_rate: Option<Decimal>,
    pub attributes: Vec<CategoryAttribute>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            full_path: c.full_path(),
            url: c.url(),
            is_root: c.is_root(),
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            parent_id: c.parent_id,
            level: c.level,
            path: c.path,
            meta_title: c.meta_title,
            meta_description: c.meta_description,
            meta_keywords: c.meta_keywords,
            image: c.image,
            icon: c.icon,
            color: c.color,
            is_active: c.is_active,
            is_featured: c.is_featured,
            is_visible: c.is_visible,
            display_order: c.display_order,
            show_in_navigation: c.show_in_navigation,
            show_in_footer: c.show_in_footer,
            product_count: c.product_count,
            total_products: c.total_products,
            commission_rate: c.commission_rate,
            attributes: c.attributes.0,
            created_by: c.created_by,
            updated_by: c.updated_by,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Nested node of the public category tree
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub level: i32,
    pub product_count: i32,
    pub is_featured: bool,
    pub url: String,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    pub fn leaf(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            slug: c.slug.clone(),
            description: c.description.clone(),
            image: c.image.clone(),
            icon: c.icon.clone(),
            color: c.color.clone(),
            level: c.level,
            product_count: c.product_count,
            is_featured: c.is_featured,
            url: c.url(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BreadcrumbItemDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub url: String,
}

impl From<&Category> for BreadcrumbItemDto {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            slug: c.slug.clone(),
            url: c.url(),
        }
    }
}

/// Category with its surroundings, used by the storefront category page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryDetailsDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub ancestors: Vec<CategoryResponseDto>,
    pub children: Vec<CategoryResponseDto>,
    pub breadcrumb: Vec<BreadcrumbItemDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteCategoryResponseDto {
    pub deleted_name: String,
    /// Number of direct children moved or deleted
    pub children_affected: u64,
}

/// What happens to the children of a deleted category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChildPolicy {
    /// Promote direct children to the deleted category's parent
    #[default]
    Move,
    /// Delete the whole subtree
    Delete,
}

/// Query params for listing categories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// Parent id, or `null` for root categories
    pub parent_id: Option<String>,
    pub level: Option<i32>,
    pub featured: Option<bool>,
    pub navigation: Option<bool>,
    /// Admin listing only
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TreeQuery {
    /// Start below this category instead of the roots
    pub root_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FeaturedQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DeleteCategoryQuery {
    #[serde(default)]
    pub handle_children: ChildPolicy,
}
