//! Error types module
//!
//! All failures in the ingestion pipeline are unified under the `AppError`
//! enum: database, object-storage, inference, directory, validation, and
//! state-machine errors. `ErrorMetadata` lets each error self-describe its
//! HTTP presentation so the API layer stays free of per-variant match arms.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so pure-domain consumers can build without a database driver.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rejected transitions
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static presentation metadata per variant:
/// (status code, error code, recoverable, suggested action, sensitive, log level)
fn static_metadata(
    error: &AppError,
) -> (u16, &'static str, bool, Option<&'static str>, bool, LogLevel) {
    match error {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry the request; contact support if the problem persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry the request; contact support if the problem persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Inference(_) => (
            500,
            "INFERENCE_ERROR",
            true,
            Some("Submit a new scan to retry the analysis"),
            true,
            LogLevel::Error,
        ),
        AppError::Directory(_) => (500, "DIRECTORY_ERROR", true, None, true, LogLevel::Error),
        AppError::InvalidInput(_) => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Correct the request and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, None, false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, None, false, LogLevel::Debug),
        AppError::InvalidState(_) => (
            409,
            "INVALID_STATE",
            false,
            Some("The record already reached a terminal status; start a new ingestion instead"),
            false,
            LogLevel::Warn,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UPSTREAM_AUTH_ERROR",
            false,
            Some("Check the configured upstream credentials"),
            false,
            LogLevel::Warn,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", false, None, true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::Inference(_) => "Inference",
            AppError::Directory(_) => "Directory",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidState(_) => "InvalidState",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Full message including the source error chain, for logs and
    /// non-production error bodies.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        while let Some(err) = source {
            details.push_str(&format!(": {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        static_metadata(self).3
    }

    fn client_message(&self) -> String {
        if self.is_sensitive() {
            // Generic message for backend failures; the detail goes to logs.
            match self {
                AppError::Database(_) => "A database error occurred".to_string(),
                AppError::Storage(_) => "A storage error occurred".to_string(),
                AppError::Inference(_) => "The analysis service failed".to_string(),
                AppError::Directory(_) => "The contact directory is unavailable".to_string(),
                _ => "An internal error occurred".to_string(),
            }
        } else {
            self.to_string()
        }
    }

    fn is_sensitive(&self) -> bool {
        static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        static_metadata(self).5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let err = AppError::InvalidInput("fileName is required".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(!err.is_recoverable());
        assert!(!err.is_sensitive());
    }

    #[test]
    fn terminal_transition_conflicts_map_to_409() {
        let err = AppError::InvalidState("upload-1 is already completed".to_string());
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_STATE");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn upstream_auth_maps_to_401() {
        let err = AppError::Unauthorized("directory rejected token".to_string());
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(err.error_code(), "UPSTREAM_AUTH_ERROR");
    }

    #[test]
    fn backend_failures_hide_details_from_clients() {
        let err = AppError::Inference("connect timeout to 10.0.0.5:8443".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("10.0.0.5"));
    }
}
