use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    IdPath, SharerId,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, MissingSharerHeaderResponse, NotFoundResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::directory::{ItemDirectory, UserDirectory};
use crate::error::BookingResult;
use crate::models::{
    BookedItem, Booker, Booking, BookingPage, BookingStatus, CreateBookingRequest,
};
use crate::repository::BookingRepository;
use crate::service::BookingService;

const TAG: &str = "bookings";

/// OpenAPI documentation for the Bookings API
#[derive(OpenApi)]
#[openapi(
    paths(create_booking, confirm_booking, get_booking, list_bookings, list_owner_bookings),
    components(
        schemas(Booking, BookedItem, Booker, BookingStatus, CreateBookingRequest),
        responses(
            NotFoundResponse,
            ForbiddenResponse,
            ConflictResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            MissingSharerHeaderResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Booking lifecycle endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Debug, Deserialize, IntoParams)]
struct ConfirmQuery {
    /// Owner's decision: true approves, false rejects
    approved: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
struct ListQuery {
    /// Temporal bucket, defaults to ALL
    state: Option<String>,
    #[serde(default)]
    from: i64,
    #[serde(default = "default_size")]
    size: i64,
}

fn default_size() -> i64 {
    10
}

impl ListQuery {
    fn page(&self) -> BookingPage {
        BookingPage {
            from: self.from,
            size: self.size,
        }
    }
}

/// Create the bookings router with all HTTP endpoints
pub fn router<R, U, I>(service: BookingService<R, U, I>) -> Router
where
    R: BookingRepository + 'static,
    U: UserDirectory + 'static,
    I: ItemDirectory + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/owner", get(list_owner_bookings))
        .route("/{id}", get(get_booking).patch(confirm_booking))
        .with_state(shared_service)
}

/// Request to book an item
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateBookingRequest,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 201, description = "Booking registered", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_booking<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    SharerId(user_id): SharerId,
    Json(input): Json<CreateBookingRequest>,
) -> BookingResult<impl IntoResponse>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let booking = service.create_booking(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Approve or reject a waiting booking
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Booking decided", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn confirm_booking<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    SharerId(user_id): SharerId,
    IdPath(id): IdPath,
    Query(query): Query<ConfirmQuery>,
) -> BookingResult<Json<Booking>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let booking = service.confirm_booking(user_id, id, query.approved).await?;
    Ok(Json(booking))
}

/// Get a booking by ID, visible to its booker or the item's owner
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 400, response = BadRequestIdResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_booking<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    SharerId(user_id): SharerId,
    IdPath(id): IdPath,
) -> BookingResult<Json<Booking>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let booking = service.get_booking(user_id, id).await?;
    Ok(Json(booking))
}

/// List the acting user's own bookings, newest start first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Bookings made by the user", body = Vec<Booking>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_bookings<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    SharerId(user_id): SharerId,
    Query(query): Query<ListQuery>,
) -> BookingResult<Json<Vec<Booking>>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let bookings = service
        .bookings_for_booker(user_id, query.state.as_deref(), query.page())
        .await?;
    Ok(Json(bookings))
}

/// List bookings of all items the acting user owns, newest start first
#[utoipa::path(
    get,
    path = "/owner",
    tag = TAG,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Bookings of the user's items", body = Vec<Booking>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_owner_bookings<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    SharerId(user_id): SharerId,
    Query(query): Query<ListQuery>,
) -> BookingResult<Json<Vec<Booking>>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let bookings = service
        .bookings_for_owner(user_id, query.state.as_deref(), query.page())
        .await?;
    Ok(Json(bookings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ItemSummary, UserSummary};
    use crate::error::BookingResult;
    use crate::models::{BookingStatus, NewBooking};
    use crate::repository::InMemoryBookingRepository;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum_helpers::SHARER_USER_HEADER;
    use chrono::{Duration, NaiveDateTime, Utc};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct StaticUsers(Vec<UserSummary>);

    #[async_trait]
    impl UserDirectory for StaticUsers {
        async fn get(&self, user_id: i64) -> BookingResult<Option<UserSummary>> {
            Ok(self.0.iter().find(|u| u.id == user_id).cloned())
        }

        async fn get_many(&self, user_ids: Vec<i64>) -> BookingResult<Vec<UserSummary>> {
            Ok(self
                .0
                .iter()
                .filter(|u| user_ids.contains(&u.id))
                .cloned()
                .collect())
        }
    }

    struct StaticItems(Vec<ItemSummary>);

    #[async_trait]
    impl ItemDirectory for StaticItems {
        async fn get(&self, item_id: i64) -> BookingResult<Option<ItemSummary>> {
            Ok(self.0.iter().find(|i| i.id == item_id).cloned())
        }

        async fn get_many(&self, item_ids: Vec<i64>) -> BookingResult<Vec<ItemSummary>> {
            Ok(self
                .0
                .iter()
                .filter(|i| item_ids.contains(&i.id))
                .cloned()
                .collect())
        }

        async fn ids_for_owner(&self, owner_id: i64) -> BookingResult<Vec<i64>> {
            Ok(self
                .0
                .iter()
                .filter(|i| i.owner_id == owner_id)
                .map(|i| i.id)
                .collect())
        }
    }

    // Owner 1 shares item 10 (available) and item 11 (unavailable);
    // users 2 and 3 are potential bookers
    fn app() -> (Router, InMemoryBookingRepository) {
        let repo = InMemoryBookingRepository::new();
        let users = StaticUsers(vec![
            UserSummary { id: 1, name: "owner".into() },
            UserSummary { id: 2, name: "booker".into() },
            UserSummary { id: 3, name: "other".into() },
        ]);
        let items = StaticItems(vec![
            ItemSummary { id: 10, name: "drill".into(), owner_id: 1, available: true },
            ItemSummary { id: 11, name: "saw".into(), owner_id: 1, available: false },
        ]);
        let service =
            BookingService::new(Arc::new(repo.clone()), Arc::new(users), Arc::new(items));
        (router(service), repo)
    }

    fn iso(t: NaiveDateTime) -> String {
        t.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    fn create_body(item_id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Body {
        Body::from(format!(
            r#"{{"item_id":{},"start":"{}","end":"{}"}}"#,
            item_id,
            iso(start),
            iso(end)
        ))
    }

    fn post_booking(user_id: i64, body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header(SHARER_USER_HEADER, user_id.to_string())
            .body(body)
            .unwrap()
    }

    fn get_with_user(uri: &str, user_id: i64) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(SHARER_USER_HEADER, user_id.to_string())
            .body(Body::empty())
            .unwrap()
    }

    fn patch_with_user(uri: &str, user_id: i64) -> Request<Body> {
        Request::builder()
            .method("PATCH")
            .uri(uri)
            .header(SHARER_USER_HEADER, user_id.to_string())
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn tomorrow() -> NaiveDateTime {
        Utc::now().naive_utc() + Duration::days(1)
    }

    #[tokio::test]
    async fn test_create_booking_returns_waiting() {
        let (app, _) = app();
        let start = tomorrow();

        let response = app
            .oneshot(post_booking(2, create_body(10, start, start + Duration::hours(2))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "WAITING");
        assert_eq!(body["item"]["name"], "drill");
        assert_eq!(body["booker"]["id"], 2);
    }

    #[tokio::test]
    async fn test_create_booking_without_header_is_bad_request() {
        let (app, _) = app();
        let start = tomorrow();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(create_body(10, start, start + Duration::hours(2)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_booking_unknown_user_is_not_found() {
        let (app, _) = app();
        let start = tomorrow();

        let response = app
            .oneshot(post_booking(99, create_body(10, start, start + Duration::hours(2))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_booking_unavailable_item_is_conflict() {
        let (app, _) = app();
        let start = tomorrow();

        let response = app
            .oneshot(post_booking(2, create_body(11, start, start + Duration::hours(2))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_booking_own_item_is_not_found() {
        let (app, _) = app();
        let start = tomorrow();

        let response = app
            .oneshot(post_booking(1, create_body(10, start, start + Duration::hours(2))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_booking_inverted_window_is_bad_request() {
        let (app, _) = app();
        let start = tomorrow();

        let response = app
            .oneshot(post_booking(2, create_body(10, start + Duration::hours(2), start)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_owner_approves_booking() {
        let (app, _) = app();
        let start = tomorrow();

        let created = app
            .clone()
            .oneshot(post_booking(2, create_body(10, start, start + Duration::hours(2))))
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(patch_with_user(&format!("/{}?approved=true", id), 1))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "APPROVED");

        // A second decision on the same booking fails
        let again = app
            .oneshot(patch_with_user(&format!("/{}?approved=false", id), 1))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_owner_confirmation_is_forbidden() {
        let (app, _) = app();
        let start = tomorrow();

        let created = app
            .clone()
            .oneshot(post_booking(2, create_body(10, start, start + Duration::hours(2))))
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_i64().unwrap();

        let response = app
            .oneshot(patch_with_user(&format!("/{}?approved=true", id), 3))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_get_booking_hidden_from_unrelated_user() {
        let (app, _) = app();
        let start = tomorrow();

        let created = app
            .clone()
            .oneshot(post_booking(2, create_body(10, start, start + Duration::hours(2))))
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_i64().unwrap();

        let as_booker = app
            .clone()
            .oneshot(get_with_user(&format!("/{}", id), 2))
            .await
            .unwrap();
        assert_eq!(as_booker.status(), StatusCode::OK);

        let as_other = app
            .oneshot(get_with_user(&format!("/{}", id), 3))
            .await
            .unwrap();
        assert_eq!(as_other.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_bookings_filters_by_bucket() {
        let (app, repo) = app();
        let now = Utc::now().naive_utc();

        // A finished booking seeded directly so it can live in the past
        repo.create(NewBooking {
            start: now - Duration::days(2),
            end: now - Duration::days(1),
            item_id: 10,
            booker_id: 2,
            status: BookingStatus::Approved,
        })
        .await
        .unwrap();
        repo.create(NewBooking {
            start: now + Duration::days(1),
            end: now + Duration::days(2),
            item_id: 10,
            booker_id: 2,
            status: BookingStatus::Waiting,
        })
        .await
        .unwrap();

        let all = app.clone().oneshot(get_with_user("/", 2)).await.unwrap();
        assert_eq!(body_json(all).await.as_array().unwrap().len(), 2);

        let past = app
            .clone()
            .oneshot(get_with_user("/?state=PAST", 2))
            .await
            .unwrap();
        let past = body_json(past).await;
        assert_eq!(past.as_array().unwrap().len(), 1);
        assert_eq!(past[0]["status"], "APPROVED");

        let waiting = app
            .clone()
            .oneshot(get_with_user("/?state=WAITING", 2))
            .await
            .unwrap();
        assert_eq!(body_json(waiting).await.as_array().unwrap().len(), 1);

        let unknown = app
            .oneshot(get_with_user("/?state=SOMEDAY", 2))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
        let body = body_json(unknown).await;
        assert_eq!(body["message"], "Unknown state: SOMEDAY");
    }

    #[tokio::test]
    async fn test_owner_listing_covers_owned_items_only() {
        let (app, _) = app();
        let start = tomorrow();

        app.clone()
            .oneshot(post_booking(2, create_body(10, start, start + Duration::hours(2))))
            .await
            .unwrap();

        let as_owner = app.clone().oneshot(get_with_user("/owner", 1)).await.unwrap();
        let body = body_json(as_owner).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["booker"]["id"], 2);

        // User 3 owns nothing
        let as_other = app.oneshot(get_with_user("/owner", 3)).await.unwrap();
        assert_eq!(body_json(as_other).await.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_listing_rejects_negative_from() {
        let (app, _) = app();

        let response = app
            .oneshot(get_with_user("/?from=-1&size=10", 2))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
