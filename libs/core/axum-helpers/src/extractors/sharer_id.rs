//! Acting-user identity extractor.
//!
//! Every non-public endpoint identifies the acting user through the
//! `X-Sharer-User-Id` request header. A missing or malformed header is a
//! malformed request (400); whether the referenced user actually exists is
//! checked later by the domain services (404).

use crate::errors::{AppError, ErrorCode};
use axum::{
    http::request::Parts,
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};

/// Header carrying the id of the user performing the request.
pub const SHARER_USER_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the `X-Sharer-User-Id` header.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::SharerId;
///
/// async fn list_bookings(SharerId(user_id): SharerId) -> String {
///     format!("Bookings for user {}", user_id)
/// }
/// ```
pub struct SharerId(pub i64);

impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = match parts.headers.get(SHARER_USER_HEADER) {
            Some(value) => value,
            None => {
                return Err(AppError::BadRequest(
                    ErrorCode::MissingHeader.default_message().to_string(),
                )
                .into_response());
            }
        };

        let id = value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Invalid {} header", SHARER_USER_HEADER))
                    .into_response()
            })?;

        Ok(SharerId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn echo(SharerId(user_id): SharerId) -> String {
        user_id.to_string()
    }

    fn app() -> Router {
        Router::new().route("/whoami", get(echo))
    }

    #[tokio::test]
    async fn test_extracts_user_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(SHARER_USER_HEADER, "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_is_bad_request() {
        let response = app()
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_header_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(SHARER_USER_HEADER, "abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
