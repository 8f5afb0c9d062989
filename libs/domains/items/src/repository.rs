use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{ItemError, ItemResult};
use crate::models::{CommentRecord, CreateItem, Item, NewComment, UpdateItem};

/// Repository trait for Item and Comment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Share a new item
    async fn create(&self, owner_id: i64, input: CreateItem) -> ItemResult<Item>;

    /// Get an item by ID
    async fn get_by_id(&self, id: i64) -> ItemResult<Option<Item>>;

    /// Bulk lookup of items by ID
    async fn get_many(&self, ids: Vec<i64>) -> ItemResult<Vec<Item>>;

    /// Items shared by one owner, ordered by ID ascending
    async fn list_for_owner(
        &self,
        owner_id: i64,
        offset: u64,
        limit: u64,
    ) -> ItemResult<Vec<Item>>;

    /// Ids of all items shared by one owner
    async fn ids_for_owner(&self, owner_id: i64) -> ItemResult<Vec<i64>>;

    /// Items answering any of the given requests
    async fn list_for_requests(&self, request_ids: Vec<i64>) -> ItemResult<Vec<Item>>;

    /// Apply a partial update to an existing item
    async fn update(&self, id: i64, input: UpdateItem) -> ItemResult<Item>;

    /// Available items whose name or description contains `text`,
    /// case-insensitively, ordered by ID ascending
    async fn search(&self, text: String, offset: u64, limit: u64) -> ItemResult<Vec<Item>>;

    /// Persist a new comment
    async fn add_comment(&self, input: NewComment) -> ItemResult<CommentRecord>;

    /// Comments on one item, oldest first
    async fn comments_for_item(&self, item_id: i64) -> ItemResult<Vec<CommentRecord>>;

    /// Comments on a set of items, grouped by item, oldest first
    async fn comments_for_items(
        &self,
        item_ids: Vec<i64>,
    ) -> ItemResult<HashMap<i64, Vec<CommentRecord>>>;
}

/// In-memory implementation of ItemRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<i64, Item>>>,
    comments: Arc<RwLock<HashMap<i64, CommentRecord>>>,
    next_id: Arc<AtomicI64>,
    next_comment_id: Arc<AtomicI64>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            comments: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            next_comment_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

fn by_id(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by_key(|i| i.id);
    items
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, owner_id: i64, input: CreateItem) -> ItemResult<Item> {
        let mut items = self.items.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let item = Item {
            id,
            name: input.name,
            description: input.description,
            available: input.available,
            owner_id,
            request_id: input.request_id,
        };
        items.insert(id, item.clone());

        tracing::info!(item_id = id, owner_id, "Created item");
        Ok(item)
    }

    async fn get_by_id(&self, id: i64) -> ItemResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn get_many(&self, ids: Vec<i64>) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
        offset: u64,
        limit: u64,
    ) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        let owned: Vec<Item> = items
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();

        Ok(by_id(owned)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn ids_for_owner(&self, owner_id: i64) -> ItemResult<Vec<i64>> {
        let items = self.items.read().await;
        let mut ids: Vec<i64> = items
            .values()
            .filter(|i| i.owner_id == owner_id)
            .map(|i| i.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn list_for_requests(&self, request_ids: Vec<i64>) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        let answering: Vec<Item> = items
            .values()
            .filter(|i| i.request_id.is_some_and(|r| request_ids.contains(&r)))
            .cloned()
            .collect();
        Ok(by_id(answering))
    }

    async fn update(&self, id: i64, input: UpdateItem) -> ItemResult<Item> {
        let mut items = self.items.write().await;

        let item = items.get_mut(&id).ok_or(ItemError::NotFound(id))?;
        item.apply_update(input);
        let updated = item.clone();

        tracing::info!(item_id = id, "Updated item");
        Ok(updated)
    }

    async fn search(&self, text: String, offset: u64, limit: u64) -> ItemResult<Vec<Item>> {
        let needle = text.to_lowercase();
        let items = self.items.read().await;
        let matching: Vec<Item> = items
            .values()
            .filter(|i| {
                i.available
                    && (i.name.to_lowercase().contains(&needle)
                        || i.description.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();

        Ok(by_id(matching)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn add_comment(&self, input: NewComment) -> ItemResult<CommentRecord> {
        let mut comments = self.comments.write().await;

        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        let comment = CommentRecord {
            id,
            text: input.text,
            item_id: input.item_id,
            author_id: input.author_id,
            created: input.created,
        };
        comments.insert(id, comment.clone());

        tracing::info!(comment_id = id, item_id = comment.item_id, "Created comment");
        Ok(comment)
    }

    async fn comments_for_item(&self, item_id: i64) -> ItemResult<Vec<CommentRecord>> {
        let comments = self.comments.read().await;
        let mut result: Vec<CommentRecord> = comments
            .values()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.created);
        Ok(result)
    }

    async fn comments_for_items(
        &self,
        item_ids: Vec<i64>,
    ) -> ItemResult<HashMap<i64, Vec<CommentRecord>>> {
        let comments = self.comments.read().await;
        let mut grouped: HashMap<i64, Vec<CommentRecord>> = HashMap::new();
        for comment in comments.values() {
            if item_ids.contains(&comment.item_id) {
                grouped.entry(comment.item_id).or_default().push(comment.clone());
            }
        }
        for list in grouped.values_mut() {
            list.sort_by_key(|c| c.created);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_input(name: &str, description: &str, available: bool) -> CreateItem {
        CreateItem {
            name: name.to_string(),
            description: description.to_string(),
            available,
            request_id: None,
        }
    }

    #[tokio::test]
    async fn test_search_matches_name_and_description_case_insensitively() {
        let repo = InMemoryItemRepository::new();
        repo.create(1, create_input("Cordless Drill", "18V", true))
            .await
            .unwrap();
        repo.create(1, create_input("Saw", "drill bits included", true))
            .await
            .unwrap();
        repo.create(1, create_input("Broken drill", "spares only", false))
            .await
            .unwrap();

        let found = repo.search("DRILL".to_string(), 0, 10).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|i| i.available));
    }

    #[tokio::test]
    async fn test_list_for_owner_ordered_by_id() {
        let repo = InMemoryItemRepository::new();
        repo.create(1, create_input("A", "a", true)).await.unwrap();
        repo.create(2, create_input("B", "b", true)).await.unwrap();
        repo.create(1, create_input("C", "c", true)).await.unwrap();

        let owned = repo.list_for_owner(1, 0, 10).await.unwrap();
        let ids: Vec<i64> = owned.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let repo = InMemoryItemRepository::new();
        let result = repo.update(9, UpdateItem::default()).await;
        assert!(matches!(result, Err(ItemError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_comments_grouped_by_item_oldest_first() {
        let repo = InMemoryItemRepository::new();
        let item = repo.create(1, create_input("A", "a", true)).await.unwrap();

        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2025, 6, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        };
        for (text, created) in [("later", day(20)), ("earlier", day(10))] {
            repo.add_comment(NewComment {
                text: text.to_string(),
                item_id: item.id,
                author_id: 2,
                created,
            })
            .await
            .unwrap();
        }

        let grouped = repo.comments_for_items(vec![item.id]).await.unwrap();
        let texts: Vec<&str> = grouped[&item.id].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["earlier", "later"]);
    }
}
