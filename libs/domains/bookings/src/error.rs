use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Booker and item owner coincide. Deliberately surfaced as "not found"
    /// rather than "forbidden" so the owner cannot probe their own items.
    #[error("Cannot book own item: {0}")]
    OwnItem(i64),

    #[error("Item {0} is not available for booking")]
    ItemUnavailable(i64),

    #[error("{0}")]
    InvalidWindow(String),

    #[error("Booking {0} is already approved")]
    AlreadyApproved(i64),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("User {user} does not own the item of booking {booking}")]
    NotOwner { user: i64, booking: i64 },

    #[error("User {user} is not related to booking {booking}")]
    Unrelated { user: i64, booking: i64 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Convert BookingError to AppError for standardized error responses
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(id) => AppError::NotFound(format!("Booking {} not found", id)),
            BookingError::UserNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            BookingError::ItemNotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            BookingError::OwnItem(item_id) => {
                AppError::NotFound(format!("Booking unavailable for item {}", item_id))
            }
            BookingError::ItemUnavailable(id) => {
                AppError::Conflict(format!("Item {} is not available for booking", id))
            }
            BookingError::InvalidWindow(msg) => AppError::BadRequest(msg),
            BookingError::AlreadyApproved(id) => {
                AppError::BadRequest(format!("Booking {} is already approved", id))
            }
            BookingError::UnknownState(s) => AppError::BadRequest(format!("Unknown state: {}", s)),
            BookingError::NotOwner { user, booking } => AppError::Forbidden(format!(
                "User {} does not own the item of booking {}",
                user, booking
            )),
            BookingError::Unrelated { user, booking } => AppError::Forbidden(format!(
                "User {} is not related to booking {}",
                user, booking
            )),
            BookingError::Validation(msg) => AppError::BadRequest(msg),
            BookingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
