//! Lookup interfaces into the user and item domains

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::error::RequestResult;

/// What the requests domain needs to know about a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

/// An item shared in answer to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerItem {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub request_id: i64,
}

/// Read-only view into the users domain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, user_id: i64) -> RequestResult<Option<UserSummary>>;
}

/// Item-side lookup of the items answering a set of requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestAnswers: Send + Sync {
    /// Items answering any of the given requests, grouped by request
    async fn answers_for(
        &self,
        request_ids: Vec<i64>,
    ) -> RequestResult<HashMap<i64, Vec<AnswerItem>>>;
}
