use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{CategoryFilter, CategorySort, CategoryStore, StoreError};
use crate::features::categories::models::Category;

const COLUMNS: &str = r#"
    id, name, slug, description, parent_id, level, path,
    meta_title, meta_description, meta_keywords, image, icon, color,
    is_active, is_featured, is_visible, display_order, show_in_navigation, show_in_footer,
    product_count, total_products, commission_rate, attributes,
    created_by, updated_by, created_at, updated_at
"#;

/// Convert database error to a store error, surfacing unique violations
fn handle_db_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        // PostgreSQL unique_violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            let constraint = db_err.constraint().unwrap_or("categories").to_string();
            return StoreError::UniqueViolation(constraint);
        }
    }
    StoreError::Database(e)
}

/// Category store backed by the `categories` table
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CategoryFilter) {
        builder.push(" WHERE TRUE");

        match filter.parent {
            Some(Some(parent_id)) => {
                builder.push(" AND parent_id = ").push_bind(parent_id);
            }
            Some(None) => {
                builder.push(" AND parent_id IS NULL");
            }
            None => {}
        }
        if let Some(id) = filter.exclude_id {
            builder.push(" AND id <> ").push_bind(id);
        }
        if let Some(name) = &filter.name {
            builder.push(" AND name = ").push_bind(name.clone());
        }
        if let Some(slug) = &filter.slug {
            builder.push(" AND slug = ").push_bind(slug.clone());
        }
        if let Some(level) = filter.level {
            builder.push(" AND level = ").push_bind(level);
        }

        let flags = [
            ("is_active", filter.is_active),
            ("is_visible", filter.is_visible),
            ("is_featured", filter.is_featured),
            ("show_in_navigation", filter.show_in_navigation),
            ("show_in_footer", filter.show_in_footer),
        ];
        for (column, value) in flags {
            if let Some(value) = value {
                builder
                    .push(format!(" AND {} = ", column))
                    .push_bind(value);
            }
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(search));
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder.push(match filter.sort {
            CategorySort::DisplayOrder => " ORDER BY display_order ASC, name ASC",
            CategorySort::Name => " ORDER BY name ASC",
        });

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
    }
}

/// Treat `%`, `_` and `\` in user input literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category {}: {:?}", id, e);
                handle_db_error(e)
            })
    }

    async fn find(&self, filter: &CategoryFilter) -> Result<Vec<Category>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM categories", COLUMNS));
        Self::push_filter(&mut builder, filter);

        builder
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                handle_db_error(e)
            })
    }

    async fn insert(&self, c: &Category) -> Result<Category, StoreError> {
        let query = format!(
            r#"
            INSERT INTO categories (
                id, name, slug, description, parent_id, level, path,
                meta_title, meta_description, meta_keywords, image, icon, color,
                is_active, is_featured, is_visible, display_order, show_in_navigation, show_in_footer,
                product_count, total_products, commission_rate, attributes,
                created_by, updated_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21, $22, $23, $24, $25, $26, $27)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(c.id)
            .bind(&c.name)
            .bind(&c.slug)
            .bind(&c.description)
            .bind(c.parent_id)
            .bind(c.level)
            .bind(&c.path)
            .bind(&c.meta_title)
            .bind(&c.meta_description)
            .bind(&c.meta_keywords)
            .bind(&c.image)
            .bind(&c.icon)
            .bind(&c.color)
            .bind(c.is_active)
            .bind(c.is_featured)
            .bind(c.is_visible)
            .bind(c.display_order)
            .bind(c.show_in_navigation)
            .bind(c.show_in_footer)
            .bind(c.product_count)
            .bind(c.total_products)
            .bind(c.commission_rate)
            .bind(&c.attributes)
            .bind(c.created_by)
            .bind(c.updated_by)
            .bind(c.created_at)
            .bind(c.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update(&self, c: &Category) -> Result<Category, StoreError> {
        let query = format!(
            r#"
            UPDATE categories
            SET name = $2, slug = $3, description = $4, parent_id = $5, level = $6, path = $7,
                meta_title = $8, meta_description = $9, meta_keywords = $10,
                image = $11, icon = $12, color = $13,
                is_active = $14, is_featured = $15, is_visible = $16, display_order = $17,
                show_in_navigation = $18, show_in_footer = $19,
                product_count = $20, total_products = $21, commission_rate = $22, attributes = $23,
                updated_by = $24, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(c.id)
            .bind(&c.name)
            .bind(&c.slug)
            .bind(&c.description)
            .bind(c.parent_id)
            .bind(c.level)
            .bind(&c.path)
            .bind(&c.meta_title)
            .bind(&c.meta_description)
            .bind(&c.meta_keywords)
            .bind(&c.image)
            .bind(&c.icon)
            .bind(&c.color)
            .bind(c.is_active)
            .bind(c.is_featured)
            .bind(c.is_visible)
            .bind(c.display_order)
            .bind(c.show_in_navigation)
            .bind(c.show_in_footer)
            .bind(c.product_count)
            .bind(c.total_products)
            .bind(c.commission_rate)
            .bind(&c.attributes)
            .bind(c.updated_by)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or(StoreError::Missing(c.id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE categories SET parent_id = $2, updated_at = NOW() WHERE parent_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(result.rows_affected())
    }
}
