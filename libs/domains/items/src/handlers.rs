use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    IdPath, SharerId, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, MissingSharerHeaderResponse, NotFoundResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::directory::{BookingAnnotator, BookingRef, UserDirectory};
use crate::error::ItemResult;
use crate::models::{
    Comment, CreateComment, CreateItem, Item, ItemDetails, ItemPage, UpdateItem,
};
use crate::repository::ItemRepository;
use crate::service::ItemService;

const TAG: &str = "items";

/// OpenAPI documentation for the Items API
#[derive(OpenApi)]
#[openapi(
    paths(create_item, update_item, get_item, list_owner_items, search_items, add_comment),
    components(
        schemas(Item, ItemDetails, CreateItem, UpdateItem, Comment, CreateComment, BookingRef),
        responses(
            NotFoundResponse,
            ForbiddenResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            MissingSharerHeaderResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Shareable item endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Debug, Deserialize, IntoParams)]
struct PageQuery {
    #[serde(default)]
    from: i64,
    #[serde(default = "default_size")]
    size: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
struct SearchQuery {
    /// Text to look for in name or description
    #[serde(default)]
    text: String,
    #[serde(default)]
    from: i64,
    #[serde(default = "default_size")]
    size: i64,
}

fn default_size() -> i64 {
    10
}

impl PageQuery {
    fn page(&self) -> ItemPage {
        ItemPage {
            from: self.from,
            size: self.size,
        }
    }
}

/// Create the items router with all HTTP endpoints
pub fn router<R, U, B>(service: ItemService<R, U, B>) -> Router
where
    R: ItemRepository + 'static,
    U: UserDirectory + 'static,
    B: BookingAnnotator + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_item).get(list_owner_items))
        .route("/search", get(search_items))
        .route("/{id}", get(get_item).patch(update_item))
        .route("/{id}/comment", post(add_comment))
        .with_state(shared_service)
}

/// Share a new item
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateItem,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 201, description = "Item shared", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    SharerId(user_id): SharerId,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> ItemResult<impl IntoResponse>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingAnnotator,
{
    let item = service.create_item(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Partially update an item (owner only)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    SharerId(user_id): SharerId,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateItem>,
) -> ItemResult<Json<Item>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingAnnotator,
{
    let item = service.update_item(user_id, id, input).await?;
    Ok(Json(item))
}

/// Get an item with comments; booking annotations are shown to the owner only
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemDetails),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    SharerId(user_id): SharerId,
    IdPath(id): IdPath,
) -> ItemResult<Json<ItemDetails>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingAnnotator,
{
    let details = service.get_item(user_id, id).await?;
    Ok(Json(details))
}

/// List the acting user's items with booking annotations, ordered by ID
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Items of the user", body = Vec<ItemDetails>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_owner_items<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    SharerId(user_id): SharerId,
    Query(query): Query<PageQuery>,
) -> ItemResult<Json<Vec<ItemDetails>>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingAnnotator,
{
    let items = service.get_owner_items(user_id, query.page()).await?;
    Ok(Json(items))
}

/// Search available items by text in name or description
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_items<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    Query(query): Query<SearchQuery>,
) -> ItemResult<Json<Vec<Item>>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingAnnotator,
{
    let page = ItemPage {
        from: query.from,
        size: query.size,
    };
    let items = service.search_items(&query.text, page).await?;
    Ok(Json(items))
}

/// Comment on an item after completing a booking of it
#[utoipa::path(
    post,
    path = "/{id}/comment",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment posted", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_comment<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    SharerId(user_id): SharerId,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<CreateComment>,
) -> ItemResult<Json<Comment>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingAnnotator,
{
    let comment = service.add_comment(user_id, id, input).await?;
    Ok(Json(comment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ScheduleView, UserSummary};
    use crate::repository::InMemoryItemRepository;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum_helpers::SHARER_USER_HEADER;
    use chrono::NaiveDateTime;
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct StaticUsers(Vec<UserSummary>);

    #[async_trait]
    impl UserDirectory for StaticUsers {
        async fn get(&self, user_id: i64) -> ItemResult<Option<UserSummary>> {
            Ok(self.0.iter().find(|u| u.id == user_id).cloned())
        }

        async fn get_many(&self, user_ids: Vec<i64>) -> ItemResult<Vec<UserSummary>> {
            Ok(self
                .0
                .iter()
                .filter(|u| user_ids.contains(&u.id))
                .cloned()
                .collect())
        }
    }

    /// Annotator that reports no bookings at all
    struct NoBookings;

    #[async_trait]
    impl BookingAnnotator for NoBookings {
        async fn schedule(&self, _: i64, _: NaiveDateTime) -> ItemResult<ScheduleView> {
            Ok(ScheduleView::default())
        }

        async fn schedules(
            &self,
            _: Vec<i64>,
            _: NaiveDateTime,
        ) -> ItemResult<HashMap<i64, ScheduleView>> {
            Ok(HashMap::new())
        }

        async fn has_finished_booking(&self, _: i64, _: i64, _: NaiveDateTime) -> ItemResult<bool> {
            Ok(false)
        }
    }

    fn app() -> Router {
        let users = StaticUsers(vec![
            UserSummary { id: 1, name: "owner".into() },
            UserSummary { id: 2, name: "visitor".into() },
        ]);
        let service = ItemService::new(
            Arc::new(InMemoryItemRepository::new()),
            Arc::new(users),
            Arc::new(NoBookings),
        );
        router(service)
    }

    fn post_item(user_id: i64, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header(SHARER_USER_HEADER, user_id.to_string())
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    const DRILL: &str = r#"{"name":"Drill","description":"Cordless drill","available":true}"#;

    #[tokio::test]
    async fn test_create_item_returns_created() {
        let response = app().oneshot(post_item(1, DRILL)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Drill");
        assert_eq!(body["owner_id"], 1);
    }

    #[tokio::test]
    async fn test_create_item_unknown_user_is_not_found() {
        let response = app().oneshot(post_item(99, DRILL)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_item_blank_name_is_bad_request() {
        let response = app()
            .oneshot(post_item(
                1,
                r#"{"name":"  ","description":"Cordless drill","available":true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_by_non_owner_is_forbidden() {
        let app = app();
        app.clone().oneshot(post_item(1, DRILL)).await.unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/1")
                    .header("content-type", "application/json")
                    .header(SHARER_USER_HEADER, "2")
                    .body(Body::from(r#"{"available":false}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_search_finds_available_items_only() {
        let app = app();
        app.clone().oneshot(post_item(1, DRILL)).await.unwrap();
        app.clone()
            .oneshot(post_item(
                1,
                r#"{"name":"Old drill","description":"spares","available":false}"#,
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/search?text=dRiLl")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Drill");

        // Empty text finds nothing
        let empty = app
            .oneshot(
                Request::builder()
                    .uri("/search?text=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(empty).await.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_comment_without_finished_booking_is_bad_request() {
        let app = app();
        app.clone().oneshot(post_item(1, DRILL)).await.unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/1/comment")
                    .header("content-type", "application/json")
                    .header(SHARER_USER_HEADER, "2")
                    .body(Body::from(r#"{"text":"worked well"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_owner_listing_includes_annotations_fields() {
        let app = app();
        app.clone().oneshot(post_item(1, DRILL)).await.unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(SHARER_USER_HEADER, "1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert!(body[0]["last_booking"].is_null());
        assert!(body[0]["comments"].as_array().unwrap().is_empty());
    }
}
