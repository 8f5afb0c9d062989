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
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        MissingSharerHeaderResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::directory::{AnswerItem, RequestAnswers, UserDirectory};
use crate::error::RequestResult;
use crate::models::{CreateRequest, ItemRequest, RequestPage, RequestWithItems};
use crate::repository::RequestRepository;
use crate::service::RequestService;

const TAG: &str = "requests";

/// OpenAPI documentation for the Requests API
#[derive(OpenApi)]
#[openapi(
    paths(create_request, list_own_requests, list_other_requests, get_request),
    components(
        schemas(ItemRequest, CreateRequest, RequestWithItems, AnswerItem),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            MissingSharerHeaderResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Item request endpoints")
    )
)]
pub struct ApiDoc;

/// Create the requests router with all HTTP endpoints
pub fn router<R, U, A>(service: RequestService<R, U, A>) -> Router
where
    R: RequestRepository + 'static,
    U: UserDirectory + 'static,
    A: RequestAnswers + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_request).get(list_own_requests))
        .route("/all", get(list_other_requests))
        .route("/{id}", get(get_request))
        .with_state(shared_service)
}

/// Post a new item request
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateRequest,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 201, description = "Request posted", body = ItemRequest),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_request<R, U, A>(
    State(service): State<Arc<RequestService<R, U, A>>>,
    SharerId(user_id): SharerId,
    ValidatedJson(input): ValidatedJson<CreateRequest>,
) -> RequestResult<impl IntoResponse>
where
    R: RequestRepository,
    U: UserDirectory,
    A: RequestAnswers,
{
    let request = service.create_request(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List the acting user's own requests with their answers, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Requests posted by the user", body = Vec<RequestWithItems>),
        (status = 400, response = MissingSharerHeaderResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_own_requests<R, U, A>(
    State(service): State<Arc<RequestService<R, U, A>>>,
    SharerId(user_id): SharerId,
) -> RequestResult<Json<Vec<RequestWithItems>>>
where
    R: RequestRepository,
    U: UserDirectory,
    A: RequestAnswers,
{
    let requests = service.own_requests(user_id).await?;
    Ok(Json(requests))
}

/// List requests posted by other users, newest first
#[utoipa::path(
    get,
    path = "/all",
    tag = TAG,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user"),
        RequestPage
    ),
    responses(
        (status = 200, description = "Requests posted by others", body = Vec<RequestWithItems>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_other_requests<R, U, A>(
    State(service): State<Arc<RequestService<R, U, A>>>,
    SharerId(user_id): SharerId,
    Query(page): Query<RequestPage>,
) -> RequestResult<Json<Vec<RequestWithItems>>>
where
    R: RequestRepository,
    U: UserDirectory,
    A: RequestAnswers,
{
    let requests = service.other_requests(user_id, page).await?;
    Ok(Json(requests))
}

/// Get a request with its answers
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Request found", body = RequestWithItems),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_request<R, U, A>(
    State(service): State<Arc<RequestService<R, U, A>>>,
    SharerId(user_id): SharerId,
    IdPath(id): IdPath,
) -> RequestResult<Json<RequestWithItems>>
where
    R: RequestRepository,
    U: UserDirectory,
    A: RequestAnswers,
{
    let request = service.get_request(user_id, id).await?;
    Ok(Json(request))
}
