use chrono::NaiveDateTime;
use sea_orm::{sea_query::StringLen, DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use crate::error::{BookingError, BookingResult};

/// Lifecycle status of a booking.
///
/// A booking is created `WAITING` and transitions exactly once to `APPROVED`
/// or `REJECTED` when the item's owner confirms it. `CANCELED` is reserved
/// for the booker-cancellation path and is never produced today.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum BookingStatus {
    /// Awaiting confirmation by the item owner
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    /// Confirmed by the owner
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Declined by the owner
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// Withdrawn by the booker (reserved, currently unreachable)
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

/// Temporal bucket selector for booking listings.
///
/// `CURRENT`, `PAST` and `FUTURE` slice on the booking window relative to the
/// moment of the query; `WAITING` and `REJECTED` select on status; `ALL` is
/// unfiltered. Every bucket sorts by `start` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, ToSchema)]
#[strum(serialize_all = "UPPERCASE")]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    /// Parse a client-supplied state string, defaulting to `ALL` when absent.
    pub fn parse(raw: Option<&str>) -> BookingResult<Self> {
        match raw {
            None => Ok(BookingState::All),
            Some(s) => s
                .parse()
                .map_err(|_| BookingError::UnknownState(s.to_string())),
        }
    }
}

/// Stored booking row, before enrichment with item and booker details
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

impl BookingRecord {
    /// Whether this booking falls into the given temporal bucket at `now`
    pub fn in_state(&self, state: BookingState, now: NaiveDateTime) -> bool {
        match state {
            BookingState::All => true,
            BookingState::Current => self.start < now && now < self.end,
            BookingState::Past => self.end < now,
            BookingState::Future => self.start > now,
            BookingState::Waiting => self.status == BookingStatus::Waiting,
            BookingState::Rejected => self.status == BookingStatus::Rejected,
        }
    }
}

/// Input for persisting a new booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

/// Item details embedded in a booking response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookedItem {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

/// Booker details embedded in a booking response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Booker {
    pub id: i64,
    pub name: String,
}

/// A booking enriched with item and booker details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub item: BookedItem,
    pub booker: Booker,
}

/// Condensed booking view used by the item display (last/next annotations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingBrief {
    pub id: i64,
    pub booker_id: i64,
}

/// Last/next APPROVED bookings of one item at a given instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemSchedule {
    pub last: Option<BookingBrief>,
    pub next: Option<BookingBrief>,
}

/// DTO for creating a new booking.
///
/// `start` and `end` stay optional at the type level so their absence is
/// reported in precondition order rather than as a deserialization failure.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub item_id: i64,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Pagination window for booking listings
#[derive(Debug, Clone, Copy)]
pub struct BookingPage {
    /// Index of the first element the caller wants to see
    pub from: i64,
    /// Page size
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

impl Default for BookingPage {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_page_size(),
        }
    }
}

impl BookingPage {
    /// Validate bounds and return `(offset, limit)`.
    ///
    /// Follows page-index arithmetic: `from` is rounded down to the start of
    /// its page (`(from / size) * size`), so a non-aligned `from` does not
    /// shift the window.
    pub fn to_offset_limit(self) -> BookingResult<(u64, u64)> {
        if self.from < 0 {
            return Err(BookingError::Validation(format!(
                "from must not be negative, got {}",
                self.from
            )));
        }
        if self.size < 1 {
            return Err(BookingError::Validation(format!(
                "size must be positive, got {}",
                self.size
            )));
        }

        let page = if self.from > 0 { self.from / self.size } else { 0 };
        Ok(((page * self.size) as u64, self.size as u64))
    }
}
