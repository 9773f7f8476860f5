use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::types::Json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::features::categories::dtos::{
    BreadcrumbItemDto, CategoryDetailsDto, CategoryTreeDto, ChildPolicy, CreateCategoryDto,
    DeleteCategoryResponseDto, ListCategoriesQuery, UpdateCategoryDto,
};
use crate::features::categories::error::CategoryError;
use crate::features::categories::models::Category;
use crate::features::categories::slug::{candidate, slugify};
use crate::features::categories::store::{CategoryFilter, CategorySort, CategoryStore, StoreError};
use crate::shared::constants::{
    DEFAULT_FEATURED_LIMIT, DEFAULT_SEARCH_LIMIT, MAX_CATEGORY_LEVEL, MAX_META_TITLE_LENGTH,
    PATH_SEPARATOR,
};
use crate::shared::types::clamp_limit;

pub type CategoryResult<T> = std::result::Result<T, CategoryError>;

fn join_path(parent_path: &str, name: &str) -> String {
    format!("{}{}{}", parent_path, PATH_SEPARATOR, name)
}

fn commission(rate: Option<f64>) -> CategoryResult<Option<Decimal>> {
    rate.map(|r| {
        Decimal::try_from(r)
            .map(|d| d.round_dp(2))
            .map_err(|_| CategoryError::Validation(format!("Invalid commission rate: {}", r)))
    })
    .transpose()
}

/// Default meta title: the name, cut to the meta title limit
fn default_meta_title(name: &str) -> String {
    name.chars().take(MAX_META_TITLE_LENGTH).collect()
}

fn required_name(name: &str) -> CategoryResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryError::Validation(
            "Category name is required".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Surface a name collision caught by the store as `DuplicateName`
fn name_conflict(name: &str) -> impl FnOnce(StoreError) -> CategoryError + '_ {
    move |e| match e {
        StoreError::UniqueViolation(constraint) if constraint.contains("name") => {
            CategoryError::DuplicateName(name.to_string())
        }
        other => other.into(),
    }
}

/// Maintains the category tree: derived fields (slug, level, path), cycle and
/// depth checks, and hierarchy queries over a [`CategoryStore`].
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
    /// Serializes tree mutations issued through this process
    write_lock: Mutex<()>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    async fn fetch(&self, id: Uuid) -> CategoryResult<Category> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::not_found(id))
    }

    async fn ensure_name_available(&self, name: &str, exclude: Option<Uuid>) -> CategoryResult<()> {
        let mut filter = CategoryFilter::new().with_name(name);
        if let Some(id) = exclude {
            filter = filter.excluding(id);
        }
        if self.store.find_one(&filter).await?.is_some() {
            return Err(CategoryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// First free slug among `base`, `base-1`, `base-2`, ...
    async fn unique_slug(&self, name: &str, exclude: Option<Uuid>) -> CategoryResult<String> {
        let base = slugify(name);
        let mut attempt = 0;
        loop {
            let slug = candidate(&base, attempt);
            let mut filter = CategoryFilter::new().with_slug(slug.as_str());
            if let Some(id) = exclude {
                filter = filter.excluding(id);
            }
            if self.store.find_one(&filter).await?.is_none() {
                return Ok(slug);
            }
            attempt += 1;
        }
    }

    /// Level and path of a node named `name` placed under `parent_id`
    async fn placement(&self, parent_id: Option<Uuid>, name: &str) -> CategoryResult<(i32, String)> {
        let Some(parent_id) = parent_id else {
            return Ok((0, name.to_string()));
        };

        let parent = self
            .store
            .find_by_id(parent_id)
            .await?
            .ok_or(CategoryError::ParentNotFound(parent_id))?;

        if parent.level >= MAX_CATEGORY_LEVEL {
            return Err(CategoryError::DepthExceeded);
        }

        Ok((parent.level + 1, join_path(&parent.path, name)))
    }

    /// Root-to-parent chain. Stops at a missing parent or a repeated id.
    async fn ancestors_of(&self, category: &Category) -> CategoryResult<Vec<Category>> {
        let mut visited = HashSet::from([category.id]);
        let mut chain = Vec::new();
        let mut next = category.parent_id;

        while let Some(parent_id) = next {
            if !visited.insert(parent_id) {
                tracing::warn!("Cycle detected above category {}", category.id);
                break;
            }
            match self.store.find_by_id(parent_id).await? {
                Some(parent) => {
                    next = parent.parent_id;
                    chain.push(parent);
                }
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Number of levels below `id` (0 for a leaf)
    async fn subtree_height(&self, id: Uuid) -> CategoryResult<i32> {
        let mut visited = HashSet::from([id]);
        let mut frontier = vec![id];
        let mut height = 0;

        loop {
            let mut next = Vec::new();
            for parent_id in frontier {
                for child in self.store.find(&CategoryFilter::children_of(Some(parent_id))).await? {
                    if visited.insert(child.id) {
                        next.push(child.id);
                    }
                }
            }
            if next.is_empty() {
                return Ok(height);
            }
            height += 1;
            frontier = next;
        }
    }

    /// Recompute level and path for every descendant of `root`
    async fn refresh_subtree(&self, root: &Category) -> CategoryResult<usize> {
        let mut visited = HashSet::from([root.id]);
        let mut stack = vec![(root.id, root.level, root.path.clone())];
        let mut refreshed = 0;

        while let Some((parent_id, level, path)) = stack.pop() {
            let children = self
                .store
                .find(&CategoryFilter::children_of(Some(parent_id)))
                .await?;
            for mut child in children {
                if !visited.insert(child.id) {
                    continue;
                }
                child.level = level + 1;
                child.path = join_path(&path, &child.name);
                let saved = self.store.update(&child).await?;
                stack.push((saved.id, saved.level, saved.path));
                refreshed += 1;
            }
        }

        Ok(refreshed)
    }

    /// Every descendant of `id`, depth-first in display order
    async fn collect_descendants(&self, id: Uuid) -> CategoryResult<Vec<Category>> {
        let mut visited = HashSet::from([id]);
        let mut found = Vec::new();
        let mut stack: Vec<Category> = self
            .store
            .find(&CategoryFilter::children_of(Some(id)))
            .await?
            .into_iter()
            .rev()
            .collect();

        while let Some(category) = stack.pop() {
            if !visited.insert(category.id) {
                continue;
            }
            let children = self
                .store
                .find(&CategoryFilter::children_of(Some(category.id)))
                .await?;
            stack.extend(children.into_iter().rev());
            found.push(category);
        }

        Ok(found)
    }

    pub async fn create(&self, dto: CreateCategoryDto, actor: Option<Uuid>) -> CategoryResult<Category> {
        let _guard = self.write_lock.lock().await;

        let name = required_name(&dto.name)?;
        self.ensure_name_available(&name, None).await?;
        let (level, path) = self.placement(dto.parent_id, &name).await?;
        let slug = self.unique_slug(&name, None).await?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            slug,
            description: dto.description,
            parent_id: dto.parent_id,
            level,
            path,
            meta_title: Some(dto.meta_title.unwrap_or_else(|| default_meta_title(&name))),
            meta_description: dto.meta_description,
            meta_keywords: dto.meta_keywords,
            image: dto.image,
            icon: dto.icon,
            color: dto.color,
            is_active: true,
            is_featured: dto.is_featured,
            is_visible: dto.is_visible,
            display_order: dto.display_order,
            show_in_navigation: dto.show_in_navigation,
            show_in_footer: dto.show_in_footer,
            product_count: 0,
            total_products: 0,
            commission_rate: commission(dto.commission_rate)?,
            attributes: Json(dto.attributes),
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
            name,
        };

        let created = self
            .store
            .insert(&category)
            .await
            .map_err(name_conflict(&category.name))?;

        tracing::info!(
            "Category created: id={}, slug={}, level={}",
            created.id,
            created.slug,
            created.level
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateCategoryDto,
        actor: Option<Uuid>,
    ) -> CategoryResult<Category> {
        let _guard = self.write_lock.lock().await;

        let current = self.fetch(id).await?;
        let mut next = current.clone();

        if let Some(name) = &dto.name {
            let name = required_name(name)?;
            if name != current.name {
                self.ensure_name_available(&name, Some(id)).await?;
                next.slug = self.unique_slug(&name, Some(id)).await?;
                next.name = name;
            }
        }

        if let Some(parent_id) = dto.parent_id {
            if let Some(parent_id) = parent_id {
                if parent_id == id {
                    return Err(CategoryError::CircularReference);
                }
                let parent = self
                    .store
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(CategoryError::ParentNotFound(parent_id))?;
                let ancestors = self.ancestors_of(&parent).await?;
                if ancestors.iter().any(|a| a.id == id) {
                    return Err(CategoryError::CircularReference);
                }
            }
            next.parent_id = parent_id;
        }

        let moved = next.parent_id != current.parent_id;
        let hierarchy_changed = moved || next.name != current.name;
        if hierarchy_changed {
            let (level, path) = self.placement(next.parent_id, &next.name).await?;
            if moved && level + self.subtree_height(id).await? > MAX_CATEGORY_LEVEL {
                return Err(CategoryError::DepthExceeded);
            }
            next.level = level;
            next.path = path;
        }

        // `Some(None)` clears the field
        if let Some(description) = dto.description {
            next.description = description;
        }
        if let Some(meta_title) = dto.meta_title {
            next.meta_title = meta_title;
        }
        if let Some(meta_description) = dto.meta_description {
            next.meta_description = meta_description;
        }
        if let Some(meta_keywords) = dto.meta_keywords {
            next.meta_keywords = meta_keywords;
        }
        if let Some(image) = dto.image {
            next.image = image;
        }
        if let Some(icon) = dto.icon {
            next.icon = icon;
        }
        if let Some(color) = dto.color {
            next.color = color;
        }
        if let Some(rate) = dto.commission_rate {
            next.commission_rate = commission(rate)?;
        }
        if let Some(attributes) = dto.attributes {
            next.attributes = Json(attributes);
        }
        next.is_active = dto.is_active.unwrap_or(next.is_active);
        next.is_featured = dto.is_featured.unwrap_or(next.is_featured);
        next.is_visible = dto.is_visible.unwrap_or(next.is_visible);
        next.display_order = dto.display_order.unwrap_or(next.display_order);
        next.show_in_navigation = dto.show_in_navigation.unwrap_or(next.show_in_navigation);
        next.show_in_footer = dto.show_in_footer.unwrap_or(next.show_in_footer);
        next.updated_by = actor.or(next.updated_by);

        let saved = self
            .store
            .update(&next)
            .await
            .map_err(name_conflict(&next.name))?;

        if hierarchy_changed {
            let refreshed = self.refresh_subtree(&saved).await?;
            tracing::info!(
                "Category {} moved to level {} ({} descendants refreshed)",
                saved.id,
                saved.level,
                refreshed
            );
        }

        tracing::info!("Category updated: id={}", saved.id);
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid, policy: ChildPolicy) -> CategoryResult<DeleteCategoryResponseDto> {
        let _guard = self.write_lock.lock().await;

        let category = self.fetch(id).await?;
        let children = self
            .store
            .find(&CategoryFilter::children_of(Some(id)))
            .await?;

        match policy {
            ChildPolicy::Move => {
                let parent = match category.parent_id {
                    Some(parent_id) => self.store.find_by_id(parent_id).await?,
                    None => None,
                };
                self.store
                    .reparent_children(id, parent.as_ref().map(|p| p.id))
                    .await?;

                for mut child in children.iter().cloned() {
                    child.parent_id = parent.as_ref().map(|p| p.id);
                    (child.level, child.path) = match &parent {
                        Some(p) => (p.level + 1, join_path(&p.path, &child.name)),
                        None => (0, child.name.clone()),
                    };
                    let promoted = self.store.update(&child).await?;
                    self.refresh_subtree(&promoted).await?;
                }
            }
            ChildPolicy::Delete => {
                let descendants = self.collect_descendants(id).await?;
                // Leaves first
                for descendant in descendants.iter().rev() {
                    self.store.delete(descendant.id).await?;
                }
                tracing::info!(
                    "Deleted {} descendants of category {}",
                    descendants.len(),
                    id
                );
            }
        }

        if !self.store.delete(id).await? {
            return Err(CategoryError::not_found(id));
        }

        tracing::info!(
            "Category deleted: id={}, policy={:?}, children_affected={}",
            id,
            policy,
            children.len()
        );

        Ok(DeleteCategoryResponseDto {
            deleted_name: category.name,
            children_affected: children.len() as u64,
        })
    }

    pub async fn get(&self, id: Uuid) -> CategoryResult<Category> {
        self.fetch(id).await
    }

    /// Public callers get `NotFound` for inactive or hidden categories
    async fn fetch_visible(&self, id: Uuid, public: bool) -> CategoryResult<Category> {
        let category = self.fetch(id).await?;
        if public && !category.is_public() {
            return Err(CategoryError::not_found(id));
        }
        Ok(category)
    }

    /// Ancestors of `category`, restricted to public ones for public callers
    async fn visible_ancestors(&self, category: &Category, public: bool) -> CategoryResult<Vec<Category>> {
        let mut ancestors = self.ancestors_of(category).await?;
        if public {
            ancestors.retain(Category::is_public);
        }
        Ok(ancestors)
    }

    /// Children or siblings listing: active for admins, active and visible for the public
    fn listing(filter: CategoryFilter, public: bool) -> CategoryFilter {
        if public {
            filter.public()
        } else {
            filter.active()
        }
    }

    /// Root first, immediate parent last; empty for a root
    pub async fn get_ancestors(&self, id: Uuid, public: bool) -> CategoryResult<Vec<Category>> {
        let category = self.fetch_visible(id, public).await?;
        self.visible_ancestors(&category, public).await
    }

    pub async fn get_descendants(&self, id: Uuid) -> CategoryResult<Vec<Category>> {
        self.fetch(id).await?;
        self.collect_descendants(id).await
    }

    /// Active direct children
    pub async fn get_children(&self, id: Uuid, public: bool) -> CategoryResult<Vec<Category>> {
        self.fetch_visible(id, public).await?;
        let filter = Self::listing(CategoryFilter::children_of(Some(id)), public);
        Ok(self.store.find(&filter).await?)
    }

    /// Active categories sharing the parent, excluding `id` itself
    pub async fn get_siblings(&self, id: Uuid, public: bool) -> CategoryResult<Vec<Category>> {
        let category = self.fetch_visible(id, public).await?;
        let filter = Self::listing(CategoryFilter::children_of(category.parent_id), public).excluding(id);
        Ok(self.store.find(&filter).await?)
    }

    /// Nested active and visible categories below `root_id`, or the whole forest
    pub async fn build_tree(&self, root_id: Option<Uuid>) -> CategoryResult<Vec<CategoryTreeDto>> {
        if let Some(id) = root_id {
            self.fetch_visible(id, true).await?;
        }

        let categories = self.store.find(&CategoryFilter::new().public()).await?;
        let mut by_parent: HashMap<Option<Uuid>, Vec<&Category>> = HashMap::new();
        for category in &categories {
            by_parent.entry(category.parent_id).or_default().push(category);
        }

        Ok(assemble(&by_parent, root_id, 0))
    }

    pub async fn build_breadcrumb(&self, id: Uuid, public: bool) -> CategoryResult<Vec<BreadcrumbItemDto>> {
        let category = self.fetch_visible(id, public).await?;
        let ancestors = self.visible_ancestors(&category, public).await?;
        Ok(breadcrumb(&ancestors, &category))
    }

    pub async fn find_featured(&self, limit: Option<i64>) -> CategoryResult<Vec<Category>> {
        let filter = CategoryFilter {
            is_featured: Some(true),
            ..CategoryFilter::new().public()
        }
        .limited(clamp_limit(limit, DEFAULT_FEATURED_LIMIT));
        Ok(self.store.find(&filter).await?)
    }

    pub async fn find_for_navigation(&self) -> CategoryResult<Vec<Category>> {
        let filter = CategoryFilter {
            show_in_navigation: Some(true),
            ..CategoryFilter::new().public()
        };
        Ok(self.store.find(&filter).await?)
    }

    pub async fn find_for_footer(&self) -> CategoryResult<Vec<Category>> {
        let filter = CategoryFilter {
            show_in_footer: Some(true),
            ..CategoryFilter::new().public()
        };
        Ok(self.store.find(&filter).await?)
    }

    /// Flat filtered listing. Hidden and inactive rows are only returned
    /// when `include_inactive` is set and the caller is an admin.
    pub async fn list(&self, query: &ListCategoriesQuery, is_admin: bool) -> CategoryResult<Vec<Category>> {
        let mut filter = if query.include_inactive && is_admin {
            CategoryFilter::new()
        } else {
            CategoryFilter::new().public()
        };

        if let Some(raw) = query.parent_id.as_deref() {
            filter.parent = Some(match raw {
                "null" => None,
                id => Some(Uuid::parse_str(id).map_err(|_| {
                    CategoryError::Validation(format!("Invalid parent_id: {}", id))
                })?),
            });
        }
        filter.level = query.level;
        if query.featured == Some(true) {
            filter.is_featured = Some(true);
        }
        if query.navigation == Some(true) {
            filter.show_in_navigation = Some(true);
        }

        Ok(self.store.find(&filter).await?)
    }

    /// Case-insensitive match on name or description, sorted by name
    pub async fn search(&self, q: &str, limit: Option<i64>) -> CategoryResult<Vec<Category>> {
        let q = q.trim();
        if q.is_empty() {
            return Err(CategoryError::Validation(
                "Search query is required".to_string(),
            ));
        }

        let filter = CategoryFilter {
            search: Some(q.to_string()),
            ..CategoryFilter::new().public()
        }
        .sorted_by(CategorySort::Name)
        .limited(clamp_limit(limit, DEFAULT_SEARCH_LIMIT));

        Ok(self.store.find(&filter).await?)
    }

    /// Look up by id, falling back to slug. Public callers never see
    /// inactive or hidden categories.
    pub async fn details(&self, identifier: &str, public: bool) -> CategoryResult<CategoryDetailsDto> {
        let by_id = match Uuid::parse_str(identifier) {
            Ok(id) => self.store.find_by_id(id).await?,
            Err(_) => None,
        };
        let category = match by_id {
            Some(category) => Some(category),
            None => {
                self.store
                    .find_one(&CategoryFilter::new().with_slug(identifier))
                    .await?
            }
        };

        let category = category
            .filter(|c| !public || c.is_public())
            .ok_or_else(|| CategoryError::not_found(identifier))?;

        let ancestors = self.visible_ancestors(&category, public).await?;
        let children = self
            .store
            .find(&Self::listing(CategoryFilter::children_of(Some(category.id)), public))
            .await?;
        let breadcrumb = breadcrumb(&ancestors, &category);

        Ok(CategoryDetailsDto {
            category: category.into(),
            ancestors: ancestors.into_iter().map(Into::into).collect(),
            children: children.into_iter().map(Into::into).collect(),
            breadcrumb,
        })
    }
}

fn breadcrumb(ancestors: &[Category], category: &Category) -> Vec<BreadcrumbItemDto> {
    ancestors
        .iter()
        .chain(std::iter::once(category))
        .map(BreadcrumbItemDto::from)
        .collect()
}

/// Depth is bounded by the level cap, so a corrupted parent link cannot recurse forever
fn assemble(
    by_parent: &HashMap<Option<Uuid>, Vec<&Category>>,
    parent: Option<Uuid>,
    depth: i32,
) -> Vec<CategoryTreeDto> {
    if depth > MAX_CATEGORY_LEVEL {
        return Vec::new();
    }

    by_parent
        .get(&parent)
        .map(|children| {
            children
                .iter()
                .map(|c| CategoryTreeDto {
                    children: assemble(by_parent, Some(c.id), depth + 1),
                    ..CategoryTreeDto::leaf(c)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::store::InMemoryCategoryStore;
    use serde_json::json;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(InMemoryCategoryStore::new()))
    }

    fn named(name: &str) -> CreateCategoryDto {
        serde_json::from_value(json!({ "name": name })).unwrap()
    }

    fn child(name: &str, parent: &Category) -> CreateCategoryDto {
        serde_json::from_value(json!({ "name": name, "parent_id": parent.id })).unwrap()
    }

    fn reparent(parent: Option<Uuid>) -> UpdateCategoryDto {
        UpdateCategoryDto {
            parent_id: Some(parent),
            ..UpdateCategoryDto::default()
        }
    }

    fn names(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Electronics > Phones > Smartphones > Android
    async fn electronics(svc: &CategoryService) -> [Category; 4] {
        let electronics = svc.create(named("Electronics"), None).await.unwrap();
        let phones = svc.create(child("Phones", &electronics), None).await.unwrap();
        let smartphones = svc.create(child("Smartphones", &phones), None).await.unwrap();
        let android = svc.create(child("Android", &smartphones), None).await.unwrap();
        [electronics, phones, smartphones, android]
    }

    #[tokio::test]
    async fn test_create_computes_level_and_path_up_to_depth_limit() {
        let svc = service();
        let [electronics, phones, smartphones, android] = electronics(&svc).await;

        assert_eq!((electronics.level, electronics.path.as_str()), (0, "Electronics"));
        assert_eq!((phones.level, phones.path.as_str()), (1, "Electronics,Phones"));
        assert_eq!(smartphones.level, 2);
        assert_eq!(android.level, 3);
        assert_eq!(android.path, "Electronics,Phones,Smartphones,Android");
        assert_eq!(android.full_path(), "Electronics > Phones > Smartphones > Android");

        let err = svc.create(child("Pixel", &android), None).await.unwrap_err();
        assert!(matches!(err, CategoryError::DepthExceeded));
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let svc = service();
        let actor = Uuid::now_v7();
        let books = svc.create(named("  Books "), Some(actor)).await.unwrap();

        assert_eq!(books.name, "Books");
        assert_eq!(books.slug, "books");
        assert_eq!(books.meta_title.as_deref(), Some("Books"));

        let long_name = "Handcrafted Artisan Kitchen Utensils And Cookware Accessories Collection";
        let long = svc.create(named(long_name), None).await.unwrap();
        assert_eq!(long.name, long_name);
        assert_eq!(long.meta_title.as_deref().map(|t| t.chars().count()), Some(60));
        assert!(long_name.starts_with(long.meta_title.as_deref().unwrap()));
        assert_eq!(books.url(), "/category/books");
        assert_eq!(books.created_by, Some(actor));
        assert!(books.is_active && books.is_visible && books.show_in_navigation);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_duplicate_names() {
        let svc = service();
        svc.create(named("Books"), None).await.unwrap();

        assert!(matches!(
            svc.create(named("Books"), None).await.unwrap_err(),
            CategoryError::DuplicateName(_)
        ));
        assert!(matches!(
            svc.create(named("   "), None).await.unwrap_err(),
            CategoryError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_create_with_missing_parent() {
        let svc = service();
        let dto: CreateCategoryDto =
            serde_json::from_value(json!({ "name": "Orphan", "parent_id": Uuid::now_v7() }))
                .unwrap();
        assert!(matches!(
            svc.create(dto, None).await.unwrap_err(),
            CategoryError::ParentNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_slug_collision_appends_suffix() {
        let svc = service();
        let first = svc.create(named("Organic Foods"), None).await.unwrap();
        let second = svc.create(named("Organic-Foods"), None).await.unwrap();
        let third = svc.create(named("organic foods!"), None).await.unwrap();

        assert_eq!(first.slug, "organic-foods");
        assert_eq!(second.slug, "organic-foods-1");
        assert_eq!(third.slug, "organic-foods-2");
    }

    #[tokio::test]
    async fn test_commission_rate_is_rounded_and_clearable() {
        let svc = service();
        let dto: CreateCategoryDto =
            serde_json::from_value(json!({ "name": "Luxury", "commission_rate": 12.505 }))
                .unwrap();
        let luxury = svc.create(dto, None).await.unwrap();
        assert!(luxury.commission_rate.is_some());
        assert!(luxury.commission_rate.unwrap().scale() <= 2);

        let cleared = svc
            .update(
                luxury.id,
                serde_json::from_value(json!({ "commission_rate": null, "description": null }))
                    .unwrap(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(cleared.commission_rate, None);
        assert_eq!(cleared.description, None);

        let untouched = svc
            .update(luxury.id, serde_json::from_value(json!({ "icon": "gem" })).unwrap(), None)
            .await
            .unwrap();
        assert_eq!(untouched.icon.as_deref(), Some("gem"));
        assert_eq!(untouched.commission_rate, None);
    }

    #[tokio::test]
    async fn test_ancestors_are_root_first() {
        let svc = service();
        let [electronics, phones, smartphones, android] = electronics(&svc).await;

        assert!(svc.get_ancestors(electronics.id, false).await.unwrap().is_empty());
        let ancestors = svc.get_ancestors(android.id, false).await.unwrap();
        assert_eq!(
            ancestors.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![electronics.id, phones.id, smartphones.id]
        );
        assert!(matches!(
            svc.get_ancestors(Uuid::now_v7(), false).await.unwrap_err(),
            CategoryError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_ancestor_walk_stops_at_missing_parent() {
        let store = Arc::new(InMemoryCategoryStore::new());
        let svc = CategoryService::new(store.clone());
        let mut orphan = crate::shared::test_helpers::sample_category("Orphan");
        orphan.parent_id = Some(Uuid::now_v7());
        orphan.level = 1;
        store.insert(&orphan).await.unwrap();

        assert!(svc.get_ancestors(orphan.id, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reparent_under_own_descendant_is_circular() {
        let svc = service();
        let [electronics, phones, smartphones, _] = electronics(&svc).await;

        for target in [phones.id, smartphones.id, electronics.id] {
            let err = svc
                .update(electronics.id, reparent(Some(target)), None)
                .await
                .unwrap_err();
            assert!(matches!(err, CategoryError::CircularReference), "{}", target);
        }
    }

    #[tokio::test]
    async fn test_reparent_updates_subtree_level_and_path() {
        let svc = service();
        let home = svc.create(named("Home"), None).await.unwrap();
        let kitchen = svc.create(named("Kitchen"), None).await.unwrap();
        let knives = svc.create(child("Knives", &kitchen), None).await.unwrap();

        let moved = svc
            .update(kitchen.id, reparent(Some(home.id)), None)
            .await
            .unwrap();
        assert_eq!(moved.parent_id, Some(home.id));
        assert_eq!((moved.level, moved.path.as_str()), (1, "Home,Kitchen"));

        let knives = svc.get(knives.id).await.unwrap();
        assert_eq!((knives.level, knives.path.as_str()), (2, "Home,Kitchen,Knives"));

        let back = svc.update(kitchen.id, reparent(None), None).await.unwrap();
        assert!(back.is_root());
        let knives = svc.get(knives.id).await.unwrap();
        assert_eq!(knives.path, "Kitchen,Knives");
    }

    #[tokio::test]
    async fn test_reparent_rejects_too_deep_subtrees() {
        let svc = service();
        let [_, _, smartphones, _] = electronics(&svc).await;
        let gadgets = svc.create(named("Gadgets"), None).await.unwrap();
        let wearables = svc.create(child("Wearables", &gadgets), None).await.unwrap();

        // Gadgets (height 1) under Smartphones (level 2) would put Wearables at level 4
        let err = svc
            .update(gadgets.id, reparent(Some(smartphones.id)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryError::DepthExceeded));

        // A leaf fits
        let moved = svc
            .update(wearables.id, reparent(Some(smartphones.id)), None)
            .await
            .unwrap();
        assert_eq!(moved.level, 3);
    }

    #[tokio::test]
    async fn test_rename_recomputes_slug_and_descendant_paths() {
        let svc = service();
        let [electronics, phones, _, android] = electronics(&svc).await;

        let unchanged = svc
            .update(
                phones.id,
                UpdateCategoryDto {
                    name: Some("Phones".to_string()),
                    description: Some(Some("Handsets".to_string())),
                    ..UpdateCategoryDto::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(unchanged.slug, "phones");
        assert_eq!(unchanged.description.as_deref(), Some("Handsets"));

        let renamed = svc
            .update(
                phones.id,
                UpdateCategoryDto {
                    name: Some("Mobile Phones".to_string()),
                    ..UpdateCategoryDto::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(renamed.slug, "mobile-phones");
        assert_eq!(renamed.path, "Electronics,Mobile Phones");

        let android = svc.get(android.id).await.unwrap();
        assert_eq!(android.path, "Electronics,Mobile Phones,Smartphones,Android");

        let err = svc
            .update(
                phones.id,
                UpdateCategoryDto {
                    name: Some(electronics.name.clone()),
                    ..UpdateCategoryDto::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_delete_move_promotes_children() {
        let svc = service();
        let [electronics, phones, smartphones, android] = electronics(&svc).await;
        let tablets = svc.create(child("Tablets", &phones), None).await.unwrap();

        let outcome = svc.delete(phones.id, ChildPolicy::Move).await.unwrap();
        assert_eq!(outcome.deleted_name, "Phones");
        assert_eq!(outcome.children_affected, 2);

        for id in [smartphones.id, tablets.id] {
            let promoted = svc.get(id).await.unwrap();
            assert_eq!(promoted.parent_id, Some(electronics.id));
            assert_eq!(promoted.level, 1);
        }
        let android = svc.get(android.id).await.unwrap();
        assert_eq!((android.level, android.path.as_str()), (2, "Electronics,Smartphones,Android"));
        assert!(matches!(
            svc.get(phones.id).await.unwrap_err(),
            CategoryError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_move_from_root_makes_children_roots() {
        let svc = service();
        let [electronics, phones, smartphones, _] = electronics(&svc).await;

        svc.delete(electronics.id, ChildPolicy::Move).await.unwrap();
        let phones = svc.get(phones.id).await.unwrap();
        assert!(phones.is_root());
        assert_eq!(phones.path, "Phones");
        assert_eq!(svc.get(smartphones.id).await.unwrap().level, 1);
    }

    #[tokio::test]
    async fn test_delete_subtree() {
        let svc = service();
        let [electronics, phones, smartphones, android] = electronics(&svc).await;
        let books = svc.create(named("Books"), None).await.unwrap();

        let outcome = svc.delete(phones.id, ChildPolicy::Delete).await.unwrap();
        assert_eq!(outcome.children_affected, 1);

        for id in [phones.id, smartphones.id, android.id] {
            assert!(matches!(
                svc.get_descendants(id).await.unwrap_err(),
                CategoryError::NotFound(_)
            ));
        }
        assert!(svc.get_descendants(electronics.id).await.unwrap().is_empty());
        assert!(svc.get(books.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_descendants_depth_first() {
        let svc = service();
        let [electronics, _, _, _] = electronics(&svc).await;
        let tv = svc.create(child("TV", &electronics), None).await.unwrap();
        let hidden: CreateCategoryDto = serde_json::from_value(
            json!({ "name": "OLED", "parent_id": tv.id, "is_visible": false }),
        )
        .unwrap();
        svc.create(hidden, None).await.unwrap();

        let descendants = svc.get_descendants(electronics.id).await.unwrap();
        assert_eq!(
            names(&descendants),
            vec!["Phones", "Smartphones", "Android", "TV", "OLED"]
        );
    }

    #[tokio::test]
    async fn test_children_and_siblings_are_active_and_ordered() {
        let svc = service();
        let root = svc.create(named("Fashion"), None).await.unwrap();
        for (name, order) in [("Shoes", 2), ("Bags", 1), ("Hats", 1)] {
            let dto: CreateCategoryDto = serde_json::from_value(
                json!({ "name": name, "parent_id": root.id, "display_order": order }),
            )
            .unwrap();
            svc.create(dto, None).await.unwrap();
        }
        let belts = svc.create(child("Belts", &root), None).await.unwrap();
        svc.update(
            belts.id,
            UpdateCategoryDto {
                is_active: Some(false),
                ..UpdateCategoryDto::default()
            },
            None,
        )
        .await
        .unwrap();

        let children = svc.get_children(root.id, false).await.unwrap();
        assert_eq!(names(&children), vec!["Bags", "Hats", "Shoes"]);

        let hats = children[1].id;
        let siblings = svc.get_siblings(hats, false).await.unwrap();
        assert_eq!(names(&siblings), vec!["Bags", "Shoes"]);
    }

    #[tokio::test]
    async fn test_build_tree_skips_hidden_and_inactive() {
        let svc = service();
        let [electronics, phones, _, _] = electronics(&svc).await;
        let books = svc.create(named("Books"), None).await.unwrap();
        svc.update(
            phones.id,
            UpdateCategoryDto {
                is_visible: Some(false),
                ..UpdateCategoryDto::default()
            },
            None,
        )
        .await
        .unwrap();
        svc.update(
            books.id,
            UpdateCategoryDto {
                display_order: Some(-1),
                ..UpdateCategoryDto::default()
            },
            None,
        )
        .await
        .unwrap();

        let tree = svc.build_tree(None).await.unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "Books");
        assert_eq!(tree[1].name, "Electronics");
        assert!(tree[1].children.is_empty());
        assert_eq!(tree[1].url, "/category/electronics");

        let subtree = svc.build_tree(Some(electronics.id)).await.unwrap();
        assert!(subtree.is_empty());
        assert!(matches!(
            svc.build_tree(Some(Uuid::now_v7())).await.unwrap_err(),
            CategoryError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_build_tree_nests_children() {
        let svc = service();
        let [electronics, _, _, _] = electronics(&svc).await;

        let tree = svc.build_tree(None).await.unwrap();
        let android = &tree[0].children[0].children[0].children[0];
        assert_eq!(android.name, "Android");
        assert_eq!(android.level, 3);
        assert!(android.children.is_empty());

        let below = svc.build_tree(Some(electronics.id)).await.unwrap();
        assert_eq!(below[0].name, "Phones");
    }

    #[tokio::test]
    async fn test_breadcrumb() {
        let svc = service();
        let [_, _, smartphones, _] = electronics(&svc).await;

        let crumbs = svc.build_breadcrumb(smartphones.id, false).await.unwrap();
        let slugs: Vec<&str> = crumbs.iter().map(|b| b.slug.as_str()).collect();
        assert_eq!(slugs, vec!["electronics", "phones", "smartphones"]);
        assert_eq!(crumbs[2].url, "/category/smartphones");
    }

    #[tokio::test]
    async fn test_public_hierarchy_views_skip_hidden_categories() {
        let svc = service();
        let [electronics, phones, smartphones, _] = electronics(&svc).await;
        let hidden = UpdateCategoryDto {
            is_visible: Some(false),
            ..UpdateCategoryDto::default()
        };
        svc.update(phones.id, hidden, None).await.unwrap();

        assert!(matches!(
            svc.build_breadcrumb(phones.id, true).await.unwrap_err(),
            CategoryError::NotFound(_)
        ));
        assert!(matches!(
            svc.get_siblings(phones.id, true).await.unwrap_err(),
            CategoryError::NotFound(_)
        ));
        assert!(svc.get_children(electronics.id, true).await.unwrap().is_empty());
        assert_eq!(names(&svc.get_children(electronics.id, false).await.unwrap()), vec!["Phones"]);

        let ancestors = svc.get_ancestors(smartphones.id, true).await.unwrap();
        assert_eq!(names(&ancestors), vec!["Electronics"]);
        let crumbs = svc.build_breadcrumb(smartphones.id, true).await.unwrap();
        let slugs: Vec<&str> = crumbs.iter().map(|b| b.slug.as_str()).collect();
        assert_eq!(slugs, vec!["electronics", "smartphones"]);

        let details = svc.details("phones", false).await.unwrap();
        assert_eq!(details.breadcrumb.len(), 2);
    }

    #[tokio::test]
    async fn test_featured_navigation_footer() {
        let svc = service();
        for (name, featured, footer) in [("A", true, false), ("B", true, true), ("C", false, true)] {
            let dto: CreateCategoryDto = serde_json::from_value(json!({
                "name": name,
                "is_featured": featured,
                "show_in_footer": footer,
                "show_in_navigation": name != "C",
            }))
            .unwrap();
            svc.create(dto, None).await.unwrap();
        }

        assert_eq!(names(&svc.find_featured(None).await.unwrap()), vec!["A", "B"]);
        assert_eq!(names(&svc.find_featured(Some(1)).await.unwrap()), vec!["A"]);
        assert_eq!(names(&svc.find_for_navigation().await.unwrap()), vec!["A", "B"]);
        assert_eq!(names(&svc.find_for_footer().await.unwrap()), vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_search() {
        let svc = service();
        let dto: CreateCategoryDto = serde_json::from_value(
            json!({ "name": "Pantry", "description": "Organic staples" }),
        )
        .unwrap();
        svc.create(dto, None).await.unwrap();
        svc.create(named("Organic Foods"), None).await.unwrap();
        svc.create(named("Toys"), None).await.unwrap();

        let hits = svc.search("ORGANIC", None).await.unwrap();
        assert_eq!(names(&hits), vec!["Organic Foods", "Pantry"]);
        assert_eq!(svc.search("organic", Some(1)).await.unwrap().len(), 1);
        assert!(matches!(
            svc.search("  ", None).await.unwrap_err(),
            CategoryError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let svc = service();
        let [electronics, phones, _, _] = electronics(&svc).await;
        svc.update(
            phones.id,
            UpdateCategoryDto {
                is_active: Some(false),
                ..UpdateCategoryDto::default()
            },
            None,
        )
        .await
        .unwrap();

        let roots = ListCategoriesQuery {
            parent_id: Some("null".to_string()),
            ..ListCategoriesQuery::default()
        };
        assert_eq!(names(&svc.list(&roots, false).await.unwrap()), vec!["Electronics"]);

        let under = ListCategoriesQuery {
            parent_id: Some(electronics.id.to_string()),
            include_inactive: true,
            ..ListCategoriesQuery::default()
        };
        assert!(svc.list(&under, false).await.unwrap().is_empty());
        assert_eq!(names(&svc.list(&under, true).await.unwrap()), vec!["Phones"]);

        let level = ListCategoriesQuery {
            level: Some(3),
            ..ListCategoriesQuery::default()
        };
        assert_eq!(names(&svc.list(&level, false).await.unwrap()), vec!["Android"]);

        let bad = ListCategoriesQuery {
            parent_id: Some("not-a-uuid".to_string()),
            ..ListCategoriesQuery::default()
        };
        assert!(matches!(
            svc.list(&bad, false).await.unwrap_err(),
            CategoryError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_details_by_id_or_slug() {
        let svc = service();
        let [_, phones, smartphones, _] = electronics(&svc).await;

        let by_slug = svc.details("phones", true).await.unwrap();
        assert_eq!(by_slug.category.id, phones.id);
        assert_eq!(by_slug.ancestors.len(), 1);
        assert_eq!(by_slug.children.len(), 1);
        assert_eq!(by_slug.breadcrumb.len(), 2);

        let by_id = svc.details(&smartphones.id.to_string(), true).await.unwrap();
        assert_eq!(by_id.category.slug, "smartphones");

        svc.update(
            phones.id,
            UpdateCategoryDto {
                is_active: Some(false),
                ..UpdateCategoryDto::default()
            },
            None,
        )
        .await
        .unwrap();
        assert!(matches!(
            svc.details("phones", true).await.unwrap_err(),
            CategoryError::NotFound(_)
        ));
        assert!(svc.details("phones", false).await.is_ok());
    }
}
