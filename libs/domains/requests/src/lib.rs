//! Requests Domain
//!
//! Item requests: a user describes something they would like to borrow, and
//! other users may share items in answer. Listings show each request together
//! with the items answering it, resolved through the
//! [`directory::RequestAnswers`] trait wired in by the app.

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use directory::{AnswerItem, RequestAnswers, UserDirectory, UserSummary};
pub use error::{RequestError, RequestResult};
pub use models::{CreateRequest, ItemRequest, RequestPage, RequestWithItems};
pub use postgres::PgRequestRepository;
pub use repository::{InMemoryRequestRepository, NewRequest, RequestRepository};
pub use service::RequestService;
