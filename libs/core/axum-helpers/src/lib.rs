//! # Axum Helpers
//!
//! A collection of utilities and helpers shared by the sharehub domain crates.
//!
//! ## Modules
//!
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (i64 path ids, validated JSON,
//!   the `X-Sharer-User-Id` identity header)
//! - **[`server`]**: Server setup, health checks, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::{IdPath, SharerId, ValidatedJson, SHARER_USER_HEADER};

// Re-export server types
pub use server::{
    create_app, create_router, health_router, run_health_checks, shutdown_signal,
    HealthCheckFuture, HealthResponse,
};
