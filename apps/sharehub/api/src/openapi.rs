//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the ShareHub API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareHub API",
        version = "0.1.0",
        description = "Item sharing service: users share items, request things to borrow, and book items for time windows",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/users", api = domain_users::handlers::ApiDoc),
        (path = "/api/items", api = domain_items::handlers::ApiDoc),
        (path = "/api/bookings", api = domain_bookings::handlers::ApiDoc),
        (path = "/api/requests", api = domain_requests::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
