//! API route assembly

pub mod health;

use axum::Router;
use std::sync::Arc;

use domain_bookings::{BookingRepository, BookingService};
use domain_items::{ItemRepository, ItemService};
use domain_requests::{RequestRepository, RequestService};
use domain_users::{UserRepository, UserService};

use crate::adapters::{
    BookingItems, BookingUsers, ItemBookings, ItemUsers, RequestItemAnswers, RequestUsers,
};

/// Wire up all domain routers over the given repositories.
///
/// The booking service is built first and then handed to the items domain
/// as its annotator, so both the booking endpoints and the item display
/// share one implementation of the last/next rules.
pub fn routes<UR, IR, BR, RR>(
    users: Arc<UR>,
    items: Arc<IR>,
    bookings: Arc<BR>,
    requests: Arc<RR>,
) -> Router
where
    UR: UserRepository + Clone + 'static,
    IR: ItemRepository + 'static,
    BR: BookingRepository + 'static,
    RR: RequestRepository + 'static,
{
    let booking_service = BookingService::new(
        bookings,
        Arc::new(BookingUsers::new(Arc::clone(&users))),
        Arc::new(BookingItems::new(Arc::clone(&items))),
    );

    let item_service = ItemService::new(
        Arc::clone(&items),
        Arc::new(ItemUsers::new(Arc::clone(&users))),
        Arc::new(ItemBookings::new(booking_service.clone())),
    );

    let request_service = RequestService::new(
        requests,
        Arc::new(RequestUsers::new(Arc::clone(&users))),
        Arc::new(RequestItemAnswers::new(items)),
    );

    let user_service = UserService::new(users.as_ref().clone());

    Router::new()
        .nest("/users", domain_users::handlers::router(user_service))
        .nest("/items", domain_items::handlers::router(item_service))
        .nest("/bookings", domain_bookings::handlers::router(booking_service))
        .nest("/requests", domain_requests::handlers::router(request_service))
}
