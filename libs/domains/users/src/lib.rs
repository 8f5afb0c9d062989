//! Users Domain
//!
//! Account management for the sharing service. Every other domain identifies
//! the acting user through the `X-Sharer-User-Id` header and resolves it
//! against this domain.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, repository::InMemoryUserRepository, service::UserService};
//!
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{CreateUser, UpdateUser, User};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
