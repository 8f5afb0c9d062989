//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestDataBuilder`: Deterministic test data generation
//! - `time`: Booking window helpers relative to the test clock
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust
//! use test_utils::{TestDataBuilder, time};
//!
//! let builder = TestDataBuilder::from_test_name("test_create_booking");
//! let email = builder.email("booker");
//! let (start, end) = time::window_in_days(1, 2);
//! assert!(start < end);
//! ```

use chrono::{Duration, NaiveDateTime, Utc};

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("item", "drill");
    /// // Returns: "test-item-<seed>-drill"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Generate a unique email address for testing
    pub fn email(&self, local: &str) -> String {
        format!("{}-{}@test.example.com", local, self.seed)
    }
}

/// Booking window helpers relative to the moment the test runs
pub mod time {
    use super::*;

    /// Current instant, in the naive UTC representation the domains use
    pub fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    /// A booking window starting `start_days` from now and ending `end_days`
    /// from now
    pub fn window_in_days(start_days: i64, end_days: i64) -> (NaiveDateTime, NaiveDateTime) {
        let now = now();
        (
            now + Duration::days(start_days),
            now + Duration::days(end_days),
        )
    }

    /// Serialize an instant the way the JSON API expects it
    pub fn iso(t: NaiveDateTime) -> String {
        t.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
