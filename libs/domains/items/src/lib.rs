//! Items Domain
//!
//! Shareable items and their comments. An item belongs to an owner, carries an
//! availability flag gating new bookings, and may answer an item request.
//! The owner sees each item annotated with its last and next approved
//! bookings; those annotations come from the bookings domain through the
//! [`directory::BookingAnnotator`] trait, wired in by the app.
//!
//! Comments are gated: only a user who completed an approved booking of the
//! item may comment on it.

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use directory::{BookingAnnotator, BookingRef, ScheduleView, UserDirectory, UserSummary};
pub use error::{ItemError, ItemResult};
pub use models::{
    Comment, CommentRecord, CreateComment, CreateItem, Item, ItemDetails, ItemPage, NewComment,
    UpdateItem,
};
pub use postgres::PgItemRepository;
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
