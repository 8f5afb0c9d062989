//! Bookings Domain
//!
//! The booking lifecycle and temporal query engine of the sharing service.
//! A booking reserves an item for a time window, starts out `WAITING`, and is
//! confirmed (approved or rejected) exactly once by the item's owner.
//! Listings slice bookings into temporal buckets (`ALL`, `CURRENT`, `PAST`,
//! `FUTURE`, `WAITING`, `REJECTED`) relative to the moment of the query, and
//! aggregate last/next lookups feed the item display.
//!
//! User and item data live in their own domains; this crate reaches them
//! through the [`directory`] traits, implemented by app-level adapters.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_bookings::{handlers, repository::InMemoryBookingRepository, service::BookingService};
//!
//! let service = BookingService::new(Arc::new(InMemoryBookingRepository::new()), users, items);
//! let router = handlers::router(service);
//! ```

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use directory::{ItemDirectory, ItemSummary, UserDirectory, UserSummary};
pub use error::{BookingError, BookingResult};
pub use models::{
    Booker, BookedItem, Booking, BookingBrief, BookingPage, BookingRecord, BookingState,
    BookingStatus, CreateBookingRequest, ItemSchedule, NewBooking,
};
pub use postgres::PgBookingRepository;
pub use repository::{BookingRepository, InMemoryBookingRepository};
pub use service::BookingService;
