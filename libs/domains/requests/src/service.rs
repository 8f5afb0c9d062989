use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::directory::{AnswerItem, RequestAnswers, UserDirectory};
use crate::error::{RequestError, RequestResult};
use crate::models::{CreateRequest, ItemRequest, RequestPage, RequestWithItems};
use crate::repository::{NewRequest, RequestRepository};

/// Service layer for item requests
pub struct RequestService<R, U, A> {
    repository: Arc<R>,
    users: Arc<U>,
    answers: Arc<A>,
}

impl<R, U, A> Clone for RequestService<R, U, A> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: Arc::clone(&self.users),
            answers: Arc::clone(&self.answers),
        }
    }
}

impl<R, U, A> RequestService<R, U, A>
where
    R: RequestRepository,
    U: UserDirectory,
    A: RequestAnswers,
{
    pub fn new(repository: Arc<R>, users: Arc<U>, answers: Arc<A>) -> Self {
        Self {
            repository,
            users,
            answers,
        }
    }

    async fn require_user(&self, user_id: i64) -> RequestResult<()> {
        self.users
            .get(user_id)
            .await?
            .ok_or(RequestError::UserNotFound(user_id))?;
        Ok(())
    }

    pub async fn create_request(
        &self,
        user_id: i64,
        input: CreateRequest,
    ) -> RequestResult<ItemRequest> {
        self.require_user(user_id).await?;

        self.repository
            .create(NewRequest {
                description: input.description,
                requester_id: user_id,
                created: Utc::now().naive_utc(),
            })
            .await
    }

    /// The acting user's own requests with their answers, newest first
    pub async fn own_requests(&self, user_id: i64) -> RequestResult<Vec<RequestWithItems>> {
        self.require_user(user_id).await?;

        let requests = self.repository.list_for_requester(user_id).await?;
        self.with_answers(requests).await
    }

    /// Requests posted by other users, newest first
    pub async fn other_requests(
        &self,
        user_id: i64,
        page: RequestPage,
    ) -> RequestResult<Vec<RequestWithItems>> {
        self.require_user(user_id).await?;
        let (offset, limit) = page.to_offset_limit()?;

        let requests = self.repository.list_others(user_id, offset, limit).await?;
        self.with_answers(requests).await
    }

    /// A single request with its answers, visible to any registered user
    pub async fn get_request(
        &self,
        user_id: i64,
        request_id: i64,
    ) -> RequestResult<RequestWithItems> {
        self.require_user(user_id).await?;

        let request = self
            .repository
            .get_by_id(request_id)
            .await?
            .ok_or(RequestError::NotFound(request_id))?;

        let mut answered = self.with_answers(vec![request]).await?;
        answered
            .pop()
            .ok_or_else(|| RequestError::Internal("request vanished during lookup".to_string()))
    }

    async fn with_answers(
        &self,
        requests: Vec<ItemRequest>,
    ) -> RequestResult<Vec<RequestWithItems>> {
        if requests.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();
        let mut answers: HashMap<i64, Vec<AnswerItem>> = self.answers.answers_for(ids).await?;

        Ok(requests
            .into_iter()
            .map(|request| {
                let items = answers.remove(&request.id).unwrap_or_default();
                RequestWithItems::new(request, items)
            })
            .collect())
    }
}
