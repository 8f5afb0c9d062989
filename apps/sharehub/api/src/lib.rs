//! ShareHub API
//!
//! Assembles the user, item, booking and request domains into one HTTP
//! service. The domain crates stay independent of each other; this crate
//! provides the cross-domain adapters and the server wiring.

pub mod adapters;
pub mod api;
pub mod config;
pub mod openapi;
