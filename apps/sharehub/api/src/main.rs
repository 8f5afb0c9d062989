//! ShareHub API server

use std::sync::Arc;

use axum_helpers::{create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_with_retry, run_migrations};
use domain_bookings::PgBookingRepository;
use domain_items::PgItemRepository;
use domain_requests::PgRequestRepository;
use domain_users::PgUserRepository;
use migration::Migrator;
use tracing::info;

use sharehub_api::api;
use sharehub_api::config::Config;
use sharehub_api::openapi::ApiDoc;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");
    let db = connect_with_retry(config.postgres.clone(), None).await?;
    run_migrations::<Migrator>(&db, config.app.name).await?;

    let users = Arc::new(PgUserRepository::new(db.clone()));
    let items = Arc::new(PgItemRepository::new(db.clone()));
    let bookings = Arc::new(PgBookingRepository::new(db.clone()));
    let requests = Arc::new(PgRequestRepository::new(db.clone()));

    let api_routes = api::routes(users, items, bookings, requests);
    let app = create_router::<ApiDoc>(api_routes)
        .merge(health_router(config.app.clone()))
        .merge(api::health::ready_router(db));

    info!("Starting {} on port {}", config.app.name, config.server.port);
    axum_helpers::create_app(app, &config.server).await?;

    info!("Shutdown complete");
    Ok(())
}
