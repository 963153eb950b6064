//! Error taxonomy for data-access operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of failures returned by the user store.
///
/// `Duplicate` and `NotExists` are the named data-access outcomes callers
/// are expected to branch on. `Database` carries any other driver failure
/// untouched so the original cause stays inspectable.
#[derive(Error, Debug)]
pub enum StoreError {
    // ============ Data-access Errors ============
    /// A uniqueness constraint was violated on insert.
    #[error("Record already exists")]
    Duplicate,

    /// A lookup by id found no matching row.
    #[error("Row does not exist")]
    NotExists,

    /// Reserved for update semantics; no operation produces it yet.
    #[error("Update failed")]
    UpdateFailed,

    /// Reserved for delete semantics; no operation produces it yet.
    #[error("Delete failed")]
    DeleteFailed,

    // ============ Infrastructure Errors ============
    /// Any other storage or driver failure.
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Tracing pipeline could not be installed.
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl StoreError {
    /// Returns the HTTP status code a transport layer should use for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Duplicate => 409,
            Self::NotExists => 404,
            Self::UpdateFailed
            | Self::DeleteFailed
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Telemetry(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate => "DUPLICATE",
            Self::NotExists => "NOT_EXISTS",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Telemetry(_) => "TELEMETRY_ERROR",
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this is one of the named data-access kinds rather than
    /// an opaque or infrastructure failure.
    #[must_use]
    pub const fn is_taxonomy(&self) -> bool {
        matches!(
            self,
            Self::Duplicate | Self::NotExists | Self::UpdateFailed | Self::DeleteFailed
        )
    }
}

/// Returns true if `err` reports a violated uniqueness constraint.
///
/// Uses the driver-independent error kind rather than a vendor error code.
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation)
        }
        _ => false,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return Self::Duplicate;
        }
        match err {
            sqlx::Error::RowNotFound => Self::NotExists,
            other => Self::Database(other),
        }
    }
}

/// Serializable error body a transport layer can return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `StoreError`.
    #[must_use]
    pub fn from_error(error: &StoreError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&StoreError> for ErrorResponse {
    fn from(error: &StoreError) -> Self {
        Self::from_error(error)
    }
}
