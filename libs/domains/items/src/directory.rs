//! Lookup interfaces into the user and booking domains.
//!
//! The items domain never calls the other domains directly; the app wires
//! adapters into these traits. Booking annotations in particular come from
//! the booking service, which owns the last/next lookup rules.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::error::ItemResult;

/// What the items domain needs to know about a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

/// Condensed booking view shown in item annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingRef {
    pub id: i64,
    pub booker_id: i64,
}

/// Last/next approved bookings of one item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleView {
    pub last: Option<BookingRef>,
    pub next: Option<BookingRef>,
}

/// Read-only view into the users domain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, user_id: i64) -> ItemResult<Option<UserSummary>>;

    /// Bulk lookup used when attaching comment authors
    async fn get_many(&self, user_ids: Vec<i64>) -> ItemResult<Vec<UserSummary>>;
}

/// Booking-side queries the item display depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingAnnotator: Send + Sync {
    /// Last/next approved bookings of a single item at instant `at`
    async fn schedule(&self, item_id: i64, at: NaiveDateTime) -> ItemResult<ScheduleView>;

    /// Grouped last/next approved bookings for a set of items
    async fn schedules(
        &self,
        item_ids: Vec<i64>,
        at: NaiveDateTime,
    ) -> ItemResult<HashMap<i64, ScheduleView>>;

    /// Whether the user completed an approved booking of the item before `at`
    async fn has_finished_booking(
        &self,
        item_id: i64,
        user_id: i64,
        at: NaiveDateTime,
    ) -> ItemResult<bool>;
}
