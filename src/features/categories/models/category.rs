use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{CATEGORY_URL_PREFIX, PATH_SEPARATOR};

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    /// 0 for roots, at most 3
    pub level: i32,
    /// Comma-joined ancestor names ending with this category's name
    pub path: String,
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
    /// Overrides the platform commission when set
    pub commission_rate: Option<Decimal>,
    pub attributes: Json<Vec<CategoryAttribute>>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn url(&self) -> String {
        format!("{}{}", CATEGORY_URL_PREFIX, self.slug)
    }

    pub fn full_path(&self) -> String {
        self.path.replace(PATH_SEPARATOR, " > ")
    }

    pub fn is_root(&self) -> bool {
        self.level == 0 && self.parent_id.is_none()
    }

    /// Shown on the public storefront
    pub fn is_public(&self) -> bool {
        self.is_active && self.is_visible
    }
}

/// Filterable product attribute declared on a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryAttribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AttributeType,
    #[serde(default)]
    pub options: Vec<AttributeOption>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_filterable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    Text,
    Number,
    Boolean,
    Select,
    Multiselect,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttributeOption {
    pub label: String,
    pub value: String,
}
