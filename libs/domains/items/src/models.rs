use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::directory::BookingRef;
use crate::error::{ItemError, ItemResult};

/// Custom validator rejecting values that are empty or whitespace-only
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// A shareable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    pub description: String,
    /// Whether the item currently accepts bookings
    pub available: bool,
    pub owner_id: i64,
    /// Request this item was shared in answer to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
}

/// DTO for sharing a new item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 512), custom(function = "validate_not_blank"))]
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// DTO for partially updating an item
///
/// Absent fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 512), custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl Item {
    /// Apply a patch from an UpdateItem DTO
    pub fn apply_update(&mut self, update: UpdateItem) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
    }
}

/// An item with its booking annotations and comments.
///
/// `last_booking` and `next_booking` are only populated for the item's owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
    pub last_booking: Option<BookingRef>,
    pub next_booking: Option<BookingRef>,
    pub comments: Vec<Comment>,
}

impl ItemDetails {
    /// Wrap a bare item with no annotations yet
    pub fn bare(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
            last_booking: None,
            next_booking: None,
            comments: vec![],
        }
    }
}

/// Stored comment row, before the author's name is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub created: NaiveDateTime,
}

/// Input for persisting a new comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub created: NaiveDateTime,
}

/// A comment as served to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    pub created: NaiveDateTime,
}

/// DTO for posting a comment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 1024), custom(function = "validate_not_blank"))]
    pub text: String,
}

/// Pagination window for item listings
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct ItemPage {
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

impl Default for ItemPage {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_page_size(),
        }
    }
}

impl ItemPage {
    /// Validate bounds and return `(offset, limit)`.
    ///
    /// `from` is rounded down to the start of its page, matching the
    /// page-index arithmetic of the booking listings.
    pub fn to_offset_limit(self) -> ItemResult<(u64, u64)> {
        if self.from < 0 {
            return Err(ItemError::Validation(format!(
                "from must not be negative, got {}",
                self.from
            )));
        }
        if self.size < 1 {
            return Err(ItemError::Validation(format!(
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
    fn test_create_item_rejects_blank_description() {
        let input = CreateItem {
            name: "Drill".to_string(),
            description: "  ".to_string(),
            available: true,
            request_id: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_apply_update_keeps_absent_fields() {
        let mut item = Item {
            id: 1,
            name: "Drill".to_string(),
            description: "Cordless".to_string(),
            available: true,
            owner_id: 1,
            request_id: None,
        };

        item.apply_update(UpdateItem {
            name: None,
            description: None,
            available: Some(false),
        });

        assert_eq!(item.name, "Drill");
        assert!(!item.available);
    }

    #[test]
    fn test_page_offset_rounds_down_to_page_start() {
        let (offset, limit) = ItemPage { from: 5, size: 2 }.to_offset_limit().unwrap();
        assert_eq!((offset, limit), (4, 2));
    }

    #[test]
    fn test_create_comment_rejects_blank_text() {
        let input = CreateComment {
            text: "\n".to_string(),
        };
        assert!(input.validate().is_err());
    }
}
