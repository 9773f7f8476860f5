use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryFilter, CategorySort, CategoryStore, StoreError};
use crate::features::categories::models::Category;

/// Arena of categories keyed by id.
///
/// Mirrors the unique constraints of the `categories` table on `name` and `slug`.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    records: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(records: &HashMap<Uuid, Category>, candidate: &Category) -> Result<(), StoreError> {
        for other in records.values().filter(|c| c.id != candidate.id) {
            if other.name == candidate.name {
                return Err(StoreError::UniqueViolation("categories_name_key".to_string()));
            }
            if other.slug == candidate.slug {
                return Err(StoreError::UniqueViolation("categories_slug_key".to_string()));
            }
        }
        Ok(())
    }
}

fn compare(sort: CategorySort, a: &Category, b: &Category) -> Ordering {
    match sort {
        CategorySort::DisplayOrder => a
            .display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name)),
        CategorySort::Name => a.name.cmp(&b.name),
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: &CategoryFilter) -> Result<Vec<Category>, StoreError> {
        let records = self.records.read().await;
        let mut found: Vec<Category> = records
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| compare(filter.sort, a, b));

        if let Some(limit) = filter.limit {
            found.truncate(limit.max(0) as usize);
        }
        Ok(found)
    }

    async fn insert(&self, category: &Category) -> Result<Category, StoreError> {
        let mut records = self.records.write().await;
        Self::check_unique(&records, category)?;
        records.insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn update(&self, category: &Category) -> Result<Category, StoreError> {
        let mut records = self.records.write().await;
        if !records.contains_key(&category.id) {
            return Err(StoreError::Missing(category.id));
        }
        Self::check_unique(&records, category)?;

        let mut stored = category.clone();
        stored.updated_at = Utc::now();
        records.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let removed = records.remove(&id).is_some();
        if removed {
            // Same effect as ON DELETE SET NULL on parent_id
            for child in records.values_mut().filter(|c| c.parent_id == Some(id)) {
                child.parent_id = None;
            }
        }
        Ok(removed)
    }

    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let now = Utc::now();
        let mut moved = 0;
        for child in records.values_mut().filter(|c| c.parent_id == Some(from)) {
            child.parent_id = to;
            child.updated_at = now;
            moved += 1;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_category as sample;

    #[tokio::test]
    async fn test_find_sorts_by_display_order_then_name() {
        let store = InMemoryCategoryStore::new();
        let mut b = sample("Books");
        b.display_order = 1;
        let mut a = sample("Apparel");
        a.display_order = 1;
        let mut z = sample("Zines");
        z.display_order = 0;
        for c in [&b, &a, &z] {
            store.insert(c).await.unwrap();
        }

        let names: Vec<String> = store
            .find(&CategoryFilter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Zines", "Apparel", "Books"]);

        let by_name = CategoryFilter::new().sorted_by(CategorySort::Name).limited(2);
        let names: Vec<String> = store
            .find(&by_name)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Apparel", "Books"]);
    }

    #[tokio::test]
    async fn test_unique_name_and_slug() {
        let store = InMemoryCategoryStore::new();
        store.insert(&sample("Books")).await.unwrap();

        let err = store.insert(&sample("Books")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(ref c) if c.contains("name")));
    }

    #[tokio::test]
    async fn test_search_matches_description_case_insensitively() {
        let store = InMemoryCategoryStore::new();
        let mut c = sample("Garden");
        c.description = Some("Seeds and Organic soil".to_string());
        store.insert(&c).await.unwrap();
        store.insert(&sample("Tools")).await.unwrap();

        let filter = CategoryFilter {
            search: Some("organic".to_string()),
            ..CategoryFilter::default()
        };
        let hits = store.find(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Garden");
    }

    #[tokio::test]
    async fn test_reparent_and_delete_detach_children() {
        let store = InMemoryCategoryStore::new();
        let root = sample("Root");
        let mid = Category {
            parent_id: Some(root.id),
            ..sample("Mid")
        };
        let leaf = Category {
            parent_id: Some(mid.id),
            ..sample("Leaf")
        };
        for c in [&root, &mid, &leaf] {
            store.insert(c).await.unwrap();
        }

        assert_eq!(store.reparent_children(mid.id, Some(root.id)).await.unwrap(), 1);
        let leaf_now = store.find_by_id(leaf.id).await.unwrap().unwrap();
        assert_eq!(leaf_now.parent_id, Some(root.id));

        assert!(store.delete(root.id).await.unwrap());
        assert!(!store.delete(root.id).await.unwrap());
        let mid_now = store.find_by_id(mid.id).await.unwrap().unwrap();
        assert_eq!(mid_now.parent_id, None);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = InMemoryCategoryStore::new();
        let err = store.update(&sample("Ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
    }
}
