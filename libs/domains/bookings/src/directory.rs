//! Lookup interfaces into the user and item domains.
//!
//! The booking core never talks to the other domains directly; the app wires
//! adapters over their repositories into these traits. This keeps the domain
//! crates free of dependencies on one another.

use async_trait::async_trait;

use crate::error::BookingResult;

/// What the booking core needs to know about a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

/// What the booking core needs to know about an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub available: bool,
}

/// Read-only view into the users domain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, user_id: i64) -> BookingResult<Option<UserSummary>>;

    /// Bulk lookup used when enriching listings
    async fn get_many(&self, user_ids: Vec<i64>) -> BookingResult<Vec<UserSummary>>;
}

/// Read-only view into the items domain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    async fn get(&self, item_id: i64) -> BookingResult<Option<ItemSummary>>;

    /// Bulk lookup used when enriching listings
    async fn get_many(&self, item_ids: Vec<i64>) -> BookingResult<Vec<ItemSummary>>;

    /// Ids of all items owned by the given user
    async fn ids_for_owner(&self, owner_id: i64) -> BookingResult<Vec<i64>>;
}
