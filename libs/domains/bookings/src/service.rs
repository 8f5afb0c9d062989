use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::directory::{ItemDirectory, ItemSummary, UserDirectory, UserSummary};
use crate::error::{BookingError, BookingResult};
use crate::models::{
    BookedItem, Booker, Booking, BookingPage, BookingRecord, BookingState, BookingStatus,
    CreateBookingRequest, ItemSchedule, NewBooking,
};
use crate::repository::BookingRepository;

/// Service layer for the booking lifecycle and temporal queries
pub struct BookingService<R, U, I> {
    repository: Arc<R>,
    users: Arc<U>,
    items: Arc<I>,
}

impl<R, U, I> Clone for BookingService<R, U, I> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: Arc::clone(&self.users),
            items: Arc::clone(&self.items),
        }
    }
}

impl<R, U, I> BookingService<R, U, I>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    pub fn new(repository: Arc<R>, users: Arc<U>, items: Arc<I>) -> Self {
        Self {
            repository,
            users,
            items,
        }
    }

    async fn require_user(&self, user_id: i64) -> BookingResult<UserSummary> {
        self.users
            .get(user_id)
            .await?
            .ok_or(BookingError::UserNotFound(user_id))
    }

    async fn require_item(&self, item_id: i64) -> BookingResult<ItemSummary> {
        self.items
            .get(item_id)
            .await?
            .ok_or(BookingError::ItemNotFound(item_id))
    }

    fn validate_window(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> BookingResult<(NaiveDateTime, NaiveDateTime)> {
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(BookingError::InvalidWindow(
                    "Start and end must be set".to_string(),
                ));
            }
        };
        if start >= end {
            return Err(BookingError::InvalidWindow(
                "Start must precede end".to_string(),
            ));
        }
        if start < now {
            return Err(BookingError::InvalidWindow(
                "Start must not be in the past".to_string(),
            ));
        }
        Ok((start, end))
    }

    /// Register a new booking request for an item.
    ///
    /// The window is validated before the item is even looked up, so a
    /// malformed request never reveals whether the item exists.
    pub async fn create_booking(
        &self,
        user_id: i64,
        request: CreateBookingRequest,
    ) -> BookingResult<Booking> {
        let booker = self.require_user(user_id).await?;

        let now = Utc::now().naive_utc();
        let (start, end) = Self::validate_window(request.start, request.end, now)?;

        let item = self.require_item(request.item_id).await?;
        if !item.available {
            return Err(BookingError::ItemUnavailable(item.id));
        }
        if item.owner_id == user_id {
            return Err(BookingError::OwnItem(item.id));
        }

        let record = self
            .repository
            .create(NewBooking {
                start,
                end,
                item_id: item.id,
                booker_id: user_id,
                status: BookingStatus::Waiting,
            })
            .await?;

        Ok(compose(record, &item, &booker))
    }

    /// Approve or reject a waiting booking. Only the item's owner may decide,
    /// and a booking that is already APPROVED cannot be decided again.
    pub async fn confirm_booking(
        &self,
        user_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> BookingResult<Booking> {
        self.require_user(user_id).await?;

        let record = self
            .repository
            .get_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;
        let item = self.require_item(record.item_id).await?;

        if item.owner_id == user_id {
            if record.status == BookingStatus::Approved {
                return Err(BookingError::AlreadyApproved(booking_id));
            }
        } else {
            return Err(BookingError::NotOwner {
                user: user_id,
                booking: booking_id,
            });
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        let updated = self.repository.confirm(booking_id, status).await?;

        let booker = self.require_user(updated.booker_id).await?;
        Ok(compose(updated, &item, &booker))
    }

    /// Fetch a single booking, visible only to its booker or the item's owner
    pub async fn get_booking(&self, user_id: i64, booking_id: i64) -> BookingResult<Booking> {
        self.require_user(user_id).await?;

        let record = self
            .repository
            .get_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;
        let item = self.require_item(record.item_id).await?;

        if record.booker_id != user_id && item.owner_id != user_id {
            return Err(BookingError::Unrelated {
                user: user_id,
                booking: booking_id,
            });
        }

        let booker = self.require_user(record.booker_id).await?;
        Ok(compose(record, &item, &booker))
    }

    /// Bookings made by the user, filtered by temporal bucket
    pub async fn bookings_for_booker(
        &self,
        user_id: i64,
        state: Option<&str>,
        page: BookingPage,
    ) -> BookingResult<Vec<Booking>> {
        self.require_user(user_id).await?;
        let state = BookingState::parse(state)?;
        let (offset, limit) = page.to_offset_limit()?;

        let now = Utc::now().naive_utc();
        let records = self
            .repository
            .list_for_booker(user_id, state, now, offset, limit)
            .await?;

        self.enrich(records).await
    }

    /// Bookings of all items the user owns, filtered by temporal bucket
    pub async fn bookings_for_owner(
        &self,
        user_id: i64,
        state: Option<&str>,
        page: BookingPage,
    ) -> BookingResult<Vec<Booking>> {
        self.require_user(user_id).await?;
        let state = BookingState::parse(state)?;
        let (offset, limit) = page.to_offset_limit()?;

        let item_ids = self.items.ids_for_owner(user_id).await?;
        if item_ids.is_empty() {
            return Ok(vec![]);
        }

        let now = Utc::now().naive_utc();
        let records = self
            .repository
            .list_for_items(item_ids, state, now, offset, limit)
            .await?;

        self.enrich(records).await
    }

    /// Last and next APPROVED bookings of a single item.
    ///
    /// The next booking is anchored on the last one: it is the earliest
    /// APPROVED booking starting after the last booking's start, and is
    /// only reported when a last booking exists at all.
    pub async fn item_schedule(
        &self,
        item_id: i64,
        at: NaiveDateTime,
    ) -> BookingResult<ItemSchedule> {
        let last = self.repository.last_for_item(item_id, at).await?;

        let next = match &last {
            Some(last) => self.repository.next_for_item(item_id, last.start).await?,
            None => None,
        };

        let brief = |b: BookingRecord| crate::models::BookingBrief {
            id: b.id,
            booker_id: b.booker_id,
        };
        Ok(ItemSchedule {
            last: last.map(brief),
            next: next.map(brief),
        })
    }

    /// Last and next APPROVED bookings per item, grouped for owner listings.
    ///
    /// Unlike [`item_schedule`](Self::item_schedule) the next booking here is
    /// independent of the last one and anchored on `at` itself.
    pub async fn schedules_for_items(
        &self,
        item_ids: Vec<i64>,
        at: NaiveDateTime,
    ) -> BookingResult<HashMap<i64, ItemSchedule>> {
        self.repository.schedules_for_items(item_ids, at).await
    }

    /// Whether the user has completed an APPROVED booking of the item
    pub async fn has_finished_booking(
        &self,
        item_id: i64,
        user_id: i64,
        at: NaiveDateTime,
    ) -> BookingResult<bool> {
        self.repository
            .has_finished_booking(item_id, user_id, at)
            .await
    }

    async fn enrich(&self, records: Vec<BookingRecord>) -> BookingResult<Vec<Booking>> {
        if records.is_empty() {
            return Ok(vec![]);
        }

        let mut item_ids: Vec<i64> = records.iter().map(|r| r.item_id).collect();
        item_ids.sort_unstable();
        item_ids.dedup();
        let mut booker_ids: Vec<i64> = records.iter().map(|r| r.booker_id).collect();
        booker_ids.sort_unstable();
        booker_ids.dedup();

        let items: HashMap<i64, ItemSummary> = self
            .items
            .get_many(item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();
        let users: HashMap<i64, UserSummary> = self
            .users
            .get_many(booker_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        records
            .into_iter()
            .map(|record| {
                let item = items.get(&record.item_id).ok_or_else(|| {
                    BookingError::Internal(format!(
                        "Item {} referenced by booking {} is missing",
                        record.item_id, record.id
                    ))
                })?;
                let booker = users.get(&record.booker_id).ok_or_else(|| {
                    BookingError::Internal(format!(
                        "User {} referenced by booking {} is missing",
                        record.booker_id, record.id
                    ))
                })?;
                Ok(compose(record, item, booker))
            })
            .collect()
    }
}

fn compose(record: BookingRecord, item: &ItemSummary, booker: &UserSummary) -> Booking {
    Booking {
        id: record.id,
        start: record.start,
        end: record.end,
        status: record.status,
        item: BookedItem {
            id: item.id,
            name: item.name.clone(),
            owner_id: item.owner_id,
        },
        booker: Booker {
            id: booker.id,
            name: booker.name.clone(),
        },
    }
}
