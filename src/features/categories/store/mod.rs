//! Record store abstraction for categories.
//!
//! The hierarchy service only talks to [`CategoryStore`]; parent/child links are
//! soft references (`parent_id`) resolved by lookup, never in-memory pointers.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::features::categories::models::Category;

pub use memory::InMemoryCategoryStore;
pub use postgres::PgCategoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated; carries the constraint (or column) name
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Category {0} does not exist")]
    Missing(Uuid),
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySort {
    /// `display_order` ascending, then `name` ascending
    #[default]
    DisplayOrder,
    Name,
}

/// Conjunction of optional predicates over category records
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    /// `Some(None)` selects roots
    pub parent: Option<Option<Uuid>>,
    pub exclude_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub level: Option<i32>,
    pub is_active: Option<bool>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub show_in_navigation: Option<bool>,
    pub show_in_footer: Option<bool>,
    /// Case-insensitive substring over name and description
    pub search: Option<String>,
    pub sort: CategorySort,
    pub limit: Option<i64>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children_of(parent: Option<Uuid>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn active(mut self) -> Self {
        self.is_active = Some(true);
        self
    }

    /// Active and visible
    pub fn public(mut self) -> Self {
        self.is_active = Some(true);
        self.is_visible = Some(true);
        self
    }

    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn sorted_by(mut self, sort: CategorySort) -> Self {
        self.sort = sort;
        self
    }

    pub fn limited(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the filter against one record (used by the in-memory store)
    pub fn matches(&self, c: &Category) -> bool {
        fn eq<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
            want.as_ref().map_or(true, |w| w == have)
        }

        let search_hit = self.search.as_ref().map_or(true, |q| {
            let q = q.to_lowercase();
            c.name.to_lowercase().contains(&q)
                || c.description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&q))
        });

        eq(&self.parent, &c.parent_id)
            && self.exclude_id.map_or(true, |id| id != c.id)
            && eq(&self.name, &c.name)
            && eq(&self.slug, &c.slug)
            && eq(&self.level, &c.level)
            && eq(&self.is_active, &c.is_active)
            && eq(&self.is_visible, &c.is_visible)
            && eq(&self.is_featured, &c.is_featured)
            && eq(&self.show_in_navigation, &c.show_in_navigation)
            && eq(&self.show_in_footer, &c.show_in_footer)
            && search_hit
    }
}

/// Single-collection record store holding the category tree
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    /// All matching records in the filter's sort order
    async fn find(&self, filter: &CategoryFilter) -> Result<Vec<Category>, StoreError>;

    async fn find_one(&self, filter: &CategoryFilter) -> Result<Option<Category>, StoreError> {
        let filter = filter.clone().limited(1);
        Ok(self.find(&filter).await?.into_iter().next())
    }

    async fn insert(&self, category: &Category) -> Result<Category, StoreError>;

    /// Replace the stored record with the same id
    async fn update(&self, category: &Category) -> Result<Category, StoreError>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Point every direct child of `from` at `to`; returns the number moved
    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> Result<u64, StoreError>;
}
