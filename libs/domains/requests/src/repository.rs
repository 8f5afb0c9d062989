use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::RequestResult;
use crate::models::ItemRequest;

/// Input for persisting a new request
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub description: String,
    pub requester_id: i64,
    pub created: NaiveDateTime,
}

/// Repository trait for ItemRequest persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Persist a new request
    async fn create(&self, input: NewRequest) -> RequestResult<ItemRequest>;

    /// Get a request by ID
    async fn get_by_id(&self, id: i64) -> RequestResult<Option<ItemRequest>>;

    /// All requests posted by one user, newest first
    async fn list_for_requester(&self, requester_id: i64) -> RequestResult<Vec<ItemRequest>>;

    /// Requests posted by everybody else, newest first
    async fn list_others(
        &self,
        requester_id: i64,
        offset: u64,
        limit: u64,
    ) -> RequestResult<Vec<ItemRequest>>;
}

/// In-memory implementation of RequestRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryRequestRepository {
    requests: Arc<RwLock<HashMap<i64, ItemRequest>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

fn newest_first(mut requests: Vec<ItemRequest>) -> Vec<ItemRequest> {
    requests.sort_by(|a, b| b.created.cmp(&a.created));
    requests
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn create(&self, input: NewRequest) -> RequestResult<ItemRequest> {
        let mut requests = self.requests.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = ItemRequest {
            id,
            description: input.description,
            requester_id: input.requester_id,
            created: input.created,
        };
        requests.insert(id, request.clone());

        tracing::info!(request_id = id, requester_id = request.requester_id, "Created request");
        Ok(request)
    }

    async fn get_by_id(&self, id: i64) -> RequestResult<Option<ItemRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn list_for_requester(&self, requester_id: i64) -> RequestResult<Vec<ItemRequest>> {
        let requests = self.requests.read().await;
        let own: Vec<ItemRequest> = requests
            .values()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect();
        Ok(newest_first(own))
    }

    async fn list_others(
        &self,
        requester_id: i64,
        offset: u64,
        limit: u64,
    ) -> RequestResult<Vec<ItemRequest>> {
        let requests = self.requests.read().await;
        let others: Vec<ItemRequest> = requests
            .values()
            .filter(|r| r.requester_id != requester_id)
            .cloned()
            .collect();

        Ok(newest_first(others)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_request(requester_id: i64, day: u32) -> NewRequest {
        NewRequest {
            description: format!("need something on day {}", day),
            requester_id,
            created: NaiveDate::from_ymd_opt(2025, 6, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_own_requests_newest_first() {
        let repo = InMemoryRequestRepository::new();
        repo.create(new_request(1, 10)).await.unwrap();
        repo.create(new_request(1, 20)).await.unwrap();
        repo.create(new_request(2, 15)).await.unwrap();

        let own = repo.list_for_requester(1).await.unwrap();
        let days: Vec<u32> = own
            .iter()
            .map(|r| {
                use chrono::Datelike;
                r.created.day()
            })
            .collect();
        assert_eq!(days, vec![20, 10]);
    }

    #[tokio::test]
    async fn test_others_excludes_own_requests() {
        let repo = InMemoryRequestRepository::new();
        repo.create(new_request(1, 10)).await.unwrap();
        repo.create(new_request(2, 15)).await.unwrap();
        repo.create(new_request(3, 20)).await.unwrap();

        let others = repo.list_others(1, 0, 10).await.unwrap();
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|r| r.requester_id != 1));
    }

    #[tokio::test]
    async fn test_others_pagination_window() {
        let repo = InMemoryRequestRepository::new();
        for day in 1..=5 {
            repo.create(new_request(2, day)).await.unwrap();
        }

        let window = repo.list_others(1, 2, 2).await.unwrap();
        assert_eq!(window.len(), 2);
        use chrono::Datelike;
        assert_eq!(window[0].created.day(), 3);
    }
}
