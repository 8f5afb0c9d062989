use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("User {user} does not own item {item}")]
    NotOwner { user: i64, item: i64 },

    /// Commenting requires a completed APPROVED booking of the item
    #[error("User {user} has no completed booking of item {item}")]
    NoCompletedBooking { user: i64, item: i64 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            ItemError::UserNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            ItemError::NotOwner { user, item } => {
                AppError::Forbidden(format!("User {} does not own item {}", user, item))
            }
            ItemError::NoCompletedBooking { user, item } => AppError::BadRequest(format!(
                "User {} has no completed booking of item {}",
                user, item
            )),
            ItemError::Validation(msg) => AppError::BadRequest(msg),
            ItemError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
