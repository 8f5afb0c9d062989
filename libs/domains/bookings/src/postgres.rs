use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, QuerySelect, Set};
use std::collections::HashMap;

use crate::entity::{ActiveModel, Column, Entity as Bookings};
use crate::error::{BookingError, BookingResult};
use crate::models::{
    BookingBrief, BookingRecord, BookingState, BookingStatus, ItemSchedule, NewBooking,
};
use crate::repository::BookingRepository;

/// PostgreSQL implementation of BookingRepository using Sea-ORM
#[derive(Clone)]
pub struct PgBookingRepository {
    db: DatabaseConnection,
}

impl PgBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn state_condition(state: BookingState, now: NaiveDateTime) -> Condition {
        match state {
            BookingState::All => Condition::all(),
            BookingState::Current => Condition::all()
                .add(Column::StartDate.lt(now))
                .add(Column::EndDate.gt(now)),
            BookingState::Past => Condition::all().add(Column::EndDate.lt(now)),
            BookingState::Future => Condition::all().add(Column::StartDate.gt(now)),
            BookingState::Waiting => {
                Condition::all().add(Column::Status.eq(BookingStatus::Waiting))
            }
            BookingState::Rejected => {
                Condition::all().add(Column::Status.eq(BookingStatus::Rejected))
            }
        }
    }

    async fn list(
        &self,
        scope: Condition,
        state: BookingState,
        now: NaiveDateTime,
        offset: u64,
        limit: u64,
    ) -> BookingResult<Vec<BookingRecord>> {
        let models = Bookings::find()
            .filter(scope)
            .filter(Self::state_condition(state, now))
            .order_by_desc(Column::StartDate)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        Ok(models.into_iter().map(BookingRecord::from).collect())
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, input: NewBooking) -> BookingResult<BookingRecord> {
        let active: ActiveModel = input.into();
        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        tracing::info!(booking_id = model.id, item_id = model.item_id, "Created booking");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> BookingResult<Option<BookingRecord>> {
        let model = Bookings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        Ok(model.map(BookingRecord::from))
    }

    async fn confirm(&self, id: i64, status: BookingStatus) -> BookingResult<BookingRecord> {
        // Conditional update so two concurrent confirmations cannot both win:
        // the row is only touched while its status is not yet APPROVED
        let result = Bookings::update_many()
            .set(ActiveModel {
                status: Set(status),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.ne(BookingStatus::Approved))
            .exec(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        if result.rows_affected == 0 {
            // Either the booking does not exist or it was already approved
            return match self.get_by_id(id).await? {
                Some(_) => Err(BookingError::AlreadyApproved(id)),
                None => Err(BookingError::NotFound(id)),
            };
        }

        tracing::info!(booking_id = id, status = %status, "Confirmed booking");
        self.get_by_id(id)
            .await?
            .ok_or(BookingError::NotFound(id))
    }

    async fn list_for_booker(
        &self,
        booker_id: i64,
        state: BookingState,
        now: NaiveDateTime,
        offset: u64,
        limit: u64,
    ) -> BookingResult<Vec<BookingRecord>> {
        let scope = Condition::all().add(Column::BookerId.eq(booker_id));
        self.list(scope, state, now, offset, limit).await
    }

    async fn list_for_items(
        &self,
        item_ids: Vec<i64>,
        state: BookingState,
        now: NaiveDateTime,
        offset: u64,
        limit: u64,
    ) -> BookingResult<Vec<BookingRecord>> {
        if item_ids.is_empty() {
            return Ok(vec![]);
        }

        let scope = Condition::all().add(Column::ItemId.is_in(item_ids));
        self.list(scope, state, now, offset, limit).await
    }

    async fn last_for_item(
        &self,
        item_id: i64,
        before: NaiveDateTime,
    ) -> BookingResult<Option<BookingRecord>> {
        let model = Bookings::find()
            .filter(Column::ItemId.eq(item_id))
            .filter(Column::Status.eq(BookingStatus::Approved))
            .filter(Column::StartDate.lt(before))
            .order_by_desc(Column::StartDate)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        Ok(model.map(BookingRecord::from))
    }

    async fn next_for_item(
        &self,
        item_id: i64,
        after: NaiveDateTime,
    ) -> BookingResult<Option<BookingRecord>> {
        let model = Bookings::find()
            .filter(Column::ItemId.eq(item_id))
            .filter(Column::Status.eq(BookingStatus::Approved))
            .filter(Column::StartDate.gt(after))
            .order_by_asc(Column::StartDate)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        Ok(model.map(BookingRecord::from))
    }

    async fn schedules_for_items(
        &self,
        item_ids: Vec<i64>,
        at: NaiveDateTime,
    ) -> BookingResult<HashMap<i64, ItemSchedule>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // One fetch of all APPROVED bookings of these items, folded per item.
        // Owner listings are small enough that this beats a pair of grouped
        // subqueries.
        let models = Bookings::find()
            .filter(Column::ItemId.is_in(item_ids))
            .filter(Column::Status.eq(BookingStatus::Approved))
            .order_by_asc(Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        let mut schedules: HashMap<i64, ItemSchedule> = HashMap::new();
        for model in models {
            let entry = schedules.entry(model.item_id).or_default();
            let brief = BookingBrief {
                id: model.id,
                booker_id: model.booker_id,
            };
            if model.start_date < at {
                // Rows arrive start-ascending, so the latest past one wins
                entry.last = Some(brief);
            } else if entry.next.is_none() {
                entry.next = Some(brief);
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
        let count = Bookings::find()
            .filter(Column::ItemId.eq(item_id))
            .filter(Column::BookerId.eq(booker_id))
            .filter(Column::Status.eq(BookingStatus::Approved))
            .filter(Column::EndDate.lt(now))
            .count(&self.db)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        Ok(count > 0)
    }
}
