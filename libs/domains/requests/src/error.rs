use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Request not found: {0}")]
    NotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RequestResult<T> = Result<T, RequestError>;

/// Convert RequestError to AppError for standardized error responses
impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NotFound(id) => AppError::NotFound(format!("Request {} not found", id)),
            RequestError::UserNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            RequestError::Validation(msg) => AppError::BadRequest(msg),
            RequestError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
