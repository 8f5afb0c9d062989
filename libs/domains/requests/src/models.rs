use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::directory::AnswerItem;
use crate::error::{RequestError, RequestResult};

/// Custom validator rejecting values that are empty or whitespace-only
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// A request for an item somebody would like to borrow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemRequest {
    /// Unique identifier
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: NaiveDateTime,
}

/// DTO for posting a new request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 512), custom(function = "validate_not_blank"))]
    pub description: String,
}

/// A request together with the items shared in answer to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RequestWithItems {
    pub id: i64,
    pub description: String,
    pub created: NaiveDateTime,
    pub items: Vec<AnswerItem>,
}

impl RequestWithItems {
    pub fn new(request: ItemRequest, items: Vec<AnswerItem>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            created: request.created,
            items,
        }
    }
}

/// Pagination window for request listings
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct RequestPage {
    /// Index of the first element the caller wants to see
    #[serde(default)]
    pub from: i64,
    /// Page size
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

impl Default for RequestPage {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_page_size(),
        }
    }
}

impl RequestPage {
    /// Validate bounds and return `(offset, limit)`, rounding `from` down to
    /// the start of its page
    pub fn to_offset_limit(self) -> RequestResult<(u64, u64)> {
        if self.from < 0 {
            return Err(RequestError::Validation(format!(
                "from must not be negative, got {}",
                self.from
            )));
        }
        if self.size < 1 {
            return Err(RequestError::Validation(format!(
                "size must be positive, got {}",
                self.size
            )));
        }

        let page = if self.from > 0 { self.from / self.size } else { 0 };
        Ok(((page * self.size) as u64, self.size as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_blank_description() {
        let input = CreateRequest {
            description: " \t ".to_string(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_page_offset_rounds_down_to_page_start() {
        let (offset, limit) = RequestPage { from: 11, size: 4 }.to_offset_limit().unwrap();
        assert_eq!((offset, limit), (8, 4));
    }
}
