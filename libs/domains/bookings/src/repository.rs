use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{BookingError, BookingResult};
use crate::models::{
    BookingBrief, BookingRecord, BookingState, BookingStatus, ItemSchedule, NewBooking,
};

/// Repository trait for Booking persistence and temporal queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking
    async fn create(&self, input: NewBooking) -> BookingResult<BookingRecord>;

    /// Get a booking by ID
    async fn get_by_id(&self, id: i64) -> BookingResult<Option<BookingRecord>>;

    /// Apply a confirmation decision, guarded by the persisted status.
    ///
    /// Fails with [`BookingError::AlreadyApproved`] when the stored booking
    /// is already `APPROVED`, so two concurrent confirmations cannot both
    /// apply.
    async fn confirm(&self, id: i64, status: BookingStatus) -> BookingResult<BookingRecord>;

    /// Bookings made by one user, bucket-filtered at `now`, newest start first
    async fn list_for_booker(
        &self,
        booker_id: i64,
        state: BookingState,
        now: NaiveDateTime,
        offset: u64,
        limit: u64,
    ) -> BookingResult<Vec<BookingRecord>>;

    /// Bookings of a set of items, bucket-filtered at `now`, newest start first
    async fn list_for_items(
        &self,
        item_ids: Vec<i64>,
        state: BookingState,
        now: NaiveDateTime,
        offset: u64,
        limit: u64,
    ) -> BookingResult<Vec<BookingRecord>>;

    /// Latest APPROVED booking of the item with `start < before`
    async fn last_for_item(
        &self,
        item_id: i64,
        before: NaiveDateTime,
    ) -> BookingResult<Option<BookingRecord>>;

    /// Earliest APPROVED booking of the item with `start > after`
    async fn next_for_item(
        &self,
        item_id: i64,
        after: NaiveDateTime,
    ) -> BookingResult<Option<BookingRecord>>;

    /// Grouped last/next APPROVED bookings for a set of items at instant `at`.
    ///
    /// Last is the max `start < at`, next the min `start >= at`, computed
    /// independently per item. Items with no APPROVED bookings are absent
    /// from the result.
    async fn schedules_for_items(
        &self,
        item_ids: Vec<i64>,
        at: NaiveDateTime,
    ) -> BookingResult<HashMap<i64, ItemSchedule>>;

    /// True iff the user has an APPROVED booking of the item that ended
    /// before `now`
    async fn has_finished_booking(
        &self,
        item_id: i64,
        booker_id: i64,
        now: NaiveDateTime,
    ) -> BookingResult<bool>;
}

/// In-memory implementation of BookingRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<i64, BookingRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

fn page(mut records: Vec<BookingRecord>, offset: u64, limit: u64) -> Vec<BookingRecord> {
    records.sort_by(|a, b| b.start.cmp(&a.start));
    records
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

fn brief(record: &BookingRecord) -> BookingBrief {
    BookingBrief {
        id: record.id,
        booker_id: record.booker_id,
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, input: NewBooking) -> BookingResult<BookingRecord> {
        let mut bookings = self.bookings.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = BookingRecord {
            id,
            start: input.start,
            end: input.end,
            item_id: input.item_id,
            booker_id: input.booker_id,
            status: input.status,
        };
        bookings.insert(id, record.clone());

        tracing::info!(booking_id = id, item_id = record.item_id, "Created booking");
        Ok(record)
    }

    async fn get_by_id(&self, id: i64) -> BookingResult<Option<BookingRecord>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&id).cloned())
    }

    async fn confirm(&self, id: i64, status: BookingStatus) -> BookingResult<BookingRecord> {
        // Status re-checked under the write lock: the guard and the update
        // must be one atomic section
        let mut bookings = self.bookings.write().await;

        let record = bookings.get_mut(&id).ok_or(BookingError::NotFound(id))?;
        if record.status == BookingStatus::Approved {
            return Err(BookingError::AlreadyApproved(id));
        }

        record.status = status;
        tracing::info!(booking_id = id, status = %status, "Confirmed booking");
        Ok(record.clone())
    }

    async fn list_for_booker(
        &self,
        booker_id: i64,
        state: BookingState,
        now: NaiveDateTime,
        offset: u64,
        limit: u64,
    ) -> BookingResult<Vec<BookingRecord>> {
        let bookings = self.bookings.read().await;
        let matching: Vec<BookingRecord> = bookings
            .values()
            .filter(|b| b.booker_id == booker_id && b.in_state(state, now))
            .cloned()
            .collect();

        Ok(page(matching, offset, limit))
    }

    async fn list_for_items(
        &self,
        item_ids: Vec<i64>,
        state: BookingState,
        now: NaiveDateTime,
        offset: u64,
        limit: u64,
    ) -> BookingResult<Vec<BookingRecord>> {
        let bookings = self.bookings.read().await;
        let matching: Vec<BookingRecord> = bookings
            .values()
            .filter(|b| item_ids.contains(&b.item_id) && b.in_state(state, now))
            .cloned()
            .collect();

        Ok(page(matching, offset, limit))
    }

    async fn last_for_item(
        &self,
        item_id: i64,
        before: NaiveDateTime,
    ) -> BookingResult<Option<BookingRecord>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| {
                b.item_id == item_id && b.status == BookingStatus::Approved && b.start < before
            })
            .max_by_key(|b| b.start)
            .cloned())
    }

    async fn next_for_item(
        &self,
        item_id: i64,
        after: NaiveDateTime,
    ) -> BookingResult<Option<BookingRecord>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| {
                b.item_id == item_id && b.status == BookingStatus::Approved && b.start > after
            })
            .min_by_key(|b| b.start)
            .cloned())
    }

    async fn schedules_for_items(
        &self,
        item_ids: Vec<i64>,
        at: NaiveDateTime,
    ) -> BookingResult<HashMap<i64, ItemSchedule>> {
        let bookings = self.bookings.read().await;
        let mut schedules: HashMap<i64, ItemSchedule> = HashMap::new();

        for record in bookings.values() {
            if record.status != BookingStatus::Approved || !item_ids.contains(&record.item_id) {
                continue;
            }

            let entry = schedules.entry(record.item_id).or_default();
            if record.start < at {
                let newer = match entry.last {
                    Some(ref current) => {
                        let current_start = bookings
                            .get(&current.id)
                            .map(|b| b.start)
                            .unwrap_or(record.start);
                        record.start > current_start
                    }
                    None => true,
                };
                if newer {
                    entry.last = Some(brief(record));
                }
            } else {
                let earlier = match entry.next {
                    Some(ref current) => {
                        let current_start = bookings
                            .get(&current.id)
                            .map(|b| b.start)
                            .unwrap_or(record.start);
                        record.start < current_start
                    }
                    None => true,
                };
                if earlier {
                    entry.next = Some(brief(record));
                }
            }
        }

        Ok(schedules)
    }

    async fn has_finished_booking(
        &self,
        item_id: i64,
        booker_id: i64,
        now: NaiveDateTime,
    ) -> BookingResult<bool> {
        let bookings = self.bookings.read().await;
        Ok(bookings.values().any(|b| {
            b.item_id == item_id
                && b.booker_id == booker_id
                && b.status == BookingStatus::Approved
                && b.end < now
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn booking(item_id: i64, booker_id: i64, start: NaiveDateTime, end: NaiveDateTime) -> NewBooking {
        NewBooking {
            start,
            end,
            item_id,
            booker_id,
            status: BookingStatus::Waiting,
        }
    }

    #[tokio::test]
    async fn test_confirm_is_one_shot() {
        let repo = InMemoryBookingRepository::new();
        let created = repo.create(booking(1, 2, at(10, 0), at(11, 0))).await.unwrap();

        let approved = repo.confirm(created.id, BookingStatus::Approved).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let again = repo.confirm(created.id, BookingStatus::Approved).await;
        assert!(matches!(again, Err(BookingError::AlreadyApproved(_))));

        // Rejecting an approved booking is equally blocked
        let reject = repo.confirm(created.id, BookingStatus::Rejected).await;
        assert!(matches!(reject, Err(BookingError::AlreadyApproved(_))));
    }

    #[tokio::test]
    async fn test_rejected_booking_can_still_be_approved() {
        let repo = InMemoryBookingRepository::new();
        let created = repo.create(booking(1, 2, at(10, 0), at(11, 0))).await.unwrap();

        repo.confirm(created.id, BookingStatus::Rejected).await.unwrap();
        let approved = repo.confirm(created.id, BookingStatus::Approved).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn test_list_for_booker_sorts_by_start_descending() {
        let repo = InMemoryBookingRepository::new();
        repo.create(booking(1, 7, at(10, 0), at(10, 5))).await.unwrap();
        repo.create(booking(2, 7, at(12, 0), at(12, 5))).await.unwrap();
        repo.create(booking(3, 7, at(11, 0), at(11, 5))).await.unwrap();
        repo.create(booking(1, 8, at(13, 0), at(13, 5))).await.unwrap();

        let result = repo
            .list_for_booker(7, BookingState::All, at(20, 0), 0, 10)
            .await
            .unwrap();

        let starts: Vec<NaiveDateTime> = result.iter().map(|b| b.start).collect();
        assert_eq!(starts, vec![at(12, 0), at(11, 0), at(10, 0)]);
    }

    #[tokio::test]
    async fn test_schedules_split_at_instant() {
        let repo = InMemoryBookingRepository::new();
        let now = at(15, 0);

        for (start, end) in [(at(10, 0), at(11, 0)), (at(12, 0), at(13, 0))] {
            let b = repo.create(booking(1, 2, start, end)).await.unwrap();
            repo.confirm(b.id, BookingStatus::Approved).await.unwrap();
        }
        let upcoming = repo.create(booking(1, 3, at(16, 0), at(17, 0))).await.unwrap();
        repo.confirm(upcoming.id, BookingStatus::Approved).await.unwrap();
        // WAITING bookings never show up in schedules
        repo.create(booking(1, 4, at(18, 0), at(19, 0))).await.unwrap();

        let schedules = repo.schedules_for_items(vec![1], now).await.unwrap();
        let schedule = schedules.get(&1).unwrap();

        let last = repo.get_by_id(schedule.last.unwrap().id).await.unwrap().unwrap();
        assert_eq!(last.start, at(12, 0));
        let next = repo.get_by_id(schedule.next.unwrap().id).await.unwrap().unwrap();
        assert_eq!(next.start, at(16, 0));
        assert_eq!(next.booker_id, 3);
    }

    #[tokio::test]
    async fn test_has_finished_booking_requires_approved_and_ended() {
        let repo = InMemoryBookingRepository::new();
        let now = at(15, 0);

        let done = repo.create(booking(1, 2, at(10, 0), at(11, 0))).await.unwrap();
        assert!(!repo.has_finished_booking(1, 2, now).await.unwrap());

        repo.confirm(done.id, BookingStatus::Approved).await.unwrap();
        assert!(repo.has_finished_booking(1, 2, now).await.unwrap());
        assert!(!repo.has_finished_booking(1, 3, now).await.unwrap());
        // Still running at `now`
        assert!(!repo.has_finished_booking(1, 2, at(10, 30)).await.unwrap());
    }
}
