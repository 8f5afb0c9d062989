//! Cross-domain adapters.
//!
//! Each domain crate declares the lookup traits it needs from its
//! collaborators; this module implements them over the concrete
//! repositories and services assembled by the app. Booking annotations for
//! items go through the booking service rather than its repository, so the
//! last/next lookup rules stay in one place.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;

use domain_bookings::{
    BookingRepository, BookingService, BookingError, BookingResult,
};
use domain_items::{ItemError, ItemRepository, ItemResult};
use domain_requests::{RequestError, RequestResult};
use domain_users::UserRepository;

/// Users domain as seen by the bookings domain
pub struct BookingUsers<R> {
    users: Arc<R>,
}

impl<R> BookingUsers<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R: UserRepository> domain_bookings::UserDirectory for BookingUsers<R> {
    async fn get(&self, user_id: i64) -> BookingResult<Option<domain_bookings::UserSummary>> {
        let user = self
            .users
            .get_by_id(user_id)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;
        Ok(user.map(|u| domain_bookings::UserSummary {
            id: u.id,
            name: u.name,
        }))
    }

    async fn get_many(
        &self,
        user_ids: Vec<i64>,
    ) -> BookingResult<Vec<domain_bookings::UserSummary>> {
        let mut result = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if let Some(user) = self.get(user_id).await? {
                result.push(user);
            }
        }
        Ok(result)
    }
}

/// Items domain as seen by the bookings domain
pub struct BookingItems<R> {
    items: Arc<R>,
}

impl<R> BookingItems<R> {
    pub fn new(items: Arc<R>) -> Self {
        Self { items }
    }
}

fn booking_item_summary(item: domain_items::Item) -> domain_bookings::ItemSummary {
    domain_bookings::ItemSummary {
        id: item.id,
        name: item.name,
        owner_id: item.owner_id,
        available: item.available,
    }
}

#[async_trait]
impl<R: ItemRepository> domain_bookings::ItemDirectory for BookingItems<R> {
    async fn get(&self, item_id: i64) -> BookingResult<Option<domain_bookings::ItemSummary>> {
        let item = self
            .items
            .get_by_id(item_id)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;
        Ok(item.map(booking_item_summary))
    }

    async fn get_many(
        &self,
        item_ids: Vec<i64>,
    ) -> BookingResult<Vec<domain_bookings::ItemSummary>> {
        let items = self
            .items
            .get_many(item_ids)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;
        Ok(items.into_iter().map(booking_item_summary).collect())
    }

    async fn ids_for_owner(&self, owner_id: i64) -> BookingResult<Vec<i64>> {
        self.items
            .ids_for_owner(owner_id)
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))
    }
}

/// Users domain as seen by the items domain
pub struct ItemUsers<R> {
    users: Arc<R>,
}

impl<R> ItemUsers<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R: UserRepository> domain_items::UserDirectory for ItemUsers<R> {
    async fn get(&self, user_id: i64) -> ItemResult<Option<domain_items::UserSummary>> {
        let user = self
            .users
            .get_by_id(user_id)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))?;
        Ok(user.map(|u| domain_items::UserSummary {
            id: u.id,
            name: u.name,
        }))
    }

    async fn get_many(&self, user_ids: Vec<i64>) -> ItemResult<Vec<domain_items::UserSummary>> {
        let mut result = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if let Some(user) = self.get(user_id).await? {
                result.push(user);
            }
        }
        Ok(result)
    }
}

/// Bookings domain as seen by the items domain.
///
/// Goes through the booking service so the single-item last/next rule and
/// the grouped owner-listing rule stay where they are defined.
pub struct ItemBookings<R, U, I> {
    bookings: BookingService<R, U, I>,
}

impl<R, U, I> ItemBookings<R, U, I> {
    pub fn new(bookings: BookingService<R, U, I>) -> Self {
        Self { bookings }
    }
}

fn booking_ref(brief: domain_bookings::BookingBrief) -> domain_items::BookingRef {
    domain_items::BookingRef {
        id: brief.id,
        booker_id: brief.booker_id,
    }
}

#[async_trait]
impl<R, U, I> domain_items::BookingAnnotator for ItemBookings<R, U, I>
where
    R: BookingRepository + 'static,
    U: domain_bookings::UserDirectory + 'static,
    I: domain_bookings::ItemDirectory + 'static,
{
    async fn schedule(
        &self,
        item_id: i64,
        at: NaiveDateTime,
    ) -> ItemResult<domain_items::ScheduleView> {
        let schedule = self
            .bookings
            .item_schedule(item_id, at)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))?;
        Ok(domain_items::ScheduleView {
            last: schedule.last.map(booking_ref),
            next: schedule.next.map(booking_ref),
        })
    }

    async fn schedules(
        &self,
        item_ids: Vec<i64>,
        at: NaiveDateTime,
    ) -> ItemResult<HashMap<i64, domain_items::ScheduleView>> {
        let schedules = self
            .bookings
            .schedules_for_items(item_ids, at)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))?;
        Ok(schedules
            .into_iter()
            .map(|(item_id, schedule)| {
                (
                    item_id,
                    domain_items::ScheduleView {
                        last: schedule.last.map(booking_ref),
                        next: schedule.next.map(booking_ref),
                    },
                )
            })
            .collect())
    }

    async fn has_finished_booking(
        &self,
        item_id: i64,
        user_id: i64,
        at: NaiveDateTime,
    ) -> ItemResult<bool> {
        self.bookings
            .has_finished_booking(item_id, user_id, at)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))
    }
}

/// Users domain as seen by the requests domain
pub struct RequestUsers<R> {
    users: Arc<R>,
}

impl<R> RequestUsers<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R: UserRepository> domain_requests::UserDirectory for RequestUsers<R> {
    async fn get(&self, user_id: i64) -> RequestResult<Option<domain_requests::UserSummary>> {
        let user = self
            .users
            .get_by_id(user_id)
            .await
            .map_err(|e| RequestError::Internal(e.to_string()))?;
        Ok(user.map(|u| domain_requests::UserSummary {
            id: u.id,
            name: u.name,
        }))
    }
}

/// Items domain as seen by the requests domain
pub struct RequestItemAnswers<R> {
    items: Arc<R>,
}

impl<R> RequestItemAnswers<R> {
    pub fn new(items: Arc<R>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl<R: ItemRepository> domain_requests::RequestAnswers for RequestItemAnswers<R> {
    async fn answers_for(
        &self,
        request_ids: Vec<i64>,
    ) -> RequestResult<HashMap<i64, Vec<domain_requests::AnswerItem>>> {
        let items = self
            .items
            .list_for_requests(request_ids)
            .await
            .map_err(|e| RequestError::Internal(e.to_string()))?;

        let mut grouped: HashMap<i64, Vec<domain_requests::AnswerItem>> = HashMap::new();
        for item in items {
            // Only items actually linked to a request come back from the
            // repository
            if let Some(request_id) = item.request_id {
                grouped
                    .entry(request_id)
                    .or_default()
                    .push(domain_requests::AnswerItem {
                        id: item.id,
                        name: item.name,
                        owner_id: item.owner_id,
                        request_id,
                    });
            }
        }
        Ok(grouped)
    }
}
