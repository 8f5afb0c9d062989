//! Type-safe error codes for API responses.
//!
//! Single source of truth for error codes used across the application. Each
//! error code carries:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid numeric identifier in a path or query parameter
    InvalidId,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Required request header is missing
    MissingHeader,

    /// Requested resource was not found
    NotFound,

    /// Acting user lacks sufficient permissions
    Forbidden,

    /// Request conflicts with current resource state
    Conflict,

    /// Request payload is semantically incorrect
    UnprocessableEntity,

    // Server errors
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// Database query returned no results
    DatabaseNotFound,

    /// Database connection or query error
    DatabaseError,

    /// Could not acquire a database connection
    DatabaseConnection,

    // Infrastructure errors
    /// Database migration error
    MigrationError,

    /// I/O error
    IoError,

    /// JSON (de)serialization error
    SerdeJsonError,
}

impl ErrorCode {
    /// String identifier for programmatic client handling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidId => "INVALID_ID",
            ErrorCode::JsonExtraction => "JSON_EXTRACTION",
            ErrorCode::MissingHeader => "MISSING_HEADER",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::DatabaseNotFound => "DATABASE_NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::DatabaseConnection => "DATABASE_CONNECTION",
            ErrorCode::MigrationError => "MIGRATION_ERROR",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code for logging and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidId => 1002,
            ErrorCode::JsonExtraction => 1003,
            ErrorCode::MissingHeader => 1004,
            ErrorCode::NotFound => 1005,
            ErrorCode::Forbidden => 1006,
            ErrorCode::Conflict => 1007,
            ErrorCode::UnprocessableEntity => 1008,
            ErrorCode::InternalError => 1500,
            ErrorCode::ServiceUnavailable => 1503,
            ErrorCode::DatabaseNotFound => 2001,
            ErrorCode::DatabaseError => 2002,
            ErrorCode::DatabaseConnection => 2003,
            ErrorCode::MigrationError => 3001,
            ErrorCode::IoError => 4001,
            ErrorCode::SerdeJsonError => 5001,
        }
    }

    /// Default human-readable message.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Request validation failed",
            ErrorCode::InvalidId => "Invalid numeric identifier",
            ErrorCode::JsonExtraction => "Invalid JSON in request body",
            ErrorCode::MissingHeader => "Required request header is missing",
            ErrorCode::NotFound => "Requested resource was not found",
            ErrorCode::Forbidden => "Access forbidden",
            ErrorCode::Conflict => "Request conflicts with current resource state",
            ErrorCode::UnprocessableEntity => "Request payload is semantically incorrect",
            ErrorCode::InternalError => "An unexpected error occurred",
            ErrorCode::ServiceUnavailable => "Service is temporarily unavailable",
            ErrorCode::DatabaseNotFound => "Database query returned no results",
            ErrorCode::DatabaseError => "A database error occurred",
            ErrorCode::DatabaseConnection => "Could not acquire a database connection",
            ErrorCode::MigrationError => "Database migration error",
            ErrorCode::IoError => "An I/O error occurred",
            ErrorCode::SerdeJsonError => "JSON (de)serialization failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let all = [
            ErrorCode::ValidationError,
            ErrorCode::InvalidId,
            ErrorCode::JsonExtraction,
            ErrorCode::MissingHeader,
            ErrorCode::NotFound,
            ErrorCode::Forbidden,
            ErrorCode::Conflict,
            ErrorCode::UnprocessableEntity,
            ErrorCode::InternalError,
            ErrorCode::ServiceUnavailable,
            ErrorCode::DatabaseNotFound,
            ErrorCode::DatabaseError,
            ErrorCode::DatabaseConnection,
            ErrorCode::MigrationError,
            ErrorCode::IoError,
            ErrorCode::SerdeJsonError,
        ];

        let mut codes: Vec<i32> = all.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_validation_error_shape() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
    }
}
