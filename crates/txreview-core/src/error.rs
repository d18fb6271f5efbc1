//! Error types for txreview-core
//!
//! Every failure the engine reports carries a stable code and a severity.
//! The severity picks the log level; the details are what the CLI shows.

use crate::types::Source;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A collaborator fetch failed or returned nothing
    FetchFailed,
    /// The approval write was not acknowledged
    MutationFailed,
    EmployeeNotFound,
    /// Request not valid in the current state
    InvalidRequest,
    /// Dataset could not be read or decoded
    DataError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::MutationFailed => "MUTATION_FAILED",
            ErrorCode::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::DataError => "DATA_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How loudly a failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Caller mistake, nothing was attempted
    Info,
    /// The action failed but the view is intact
    Warning,
    /// A fetch failed
    Error,
    /// The backend cannot serve anything
    Critical,
}

impl ErrorSeverity {
    /// Log level used by [`DefaultErrorLogger`]
    pub fn level(&self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        }
    }
}

/// User-facing report of a [`CoreError`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub severity: ErrorSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)?;
        for hint in &self.hints {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

/// Main error type for txreview-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Fetch from {origin} failed: {message}")]
    FetchFailed { origin: Source, message: String },

    #[error("Approval update for {transaction_id} failed: {message}")]
    MutationFailed {
        transaction_id: String,
        message: String,
    },

    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Data error: {message}")]
    DataError { message: String },
}

impl CoreError {
    /// Shorthand for a failed collaborator fetch
    pub fn fetch(origin: Source, message: impl Into<String>) -> Self {
        CoreError::FetchFailed {
            origin,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::MutationFailed { .. } => ErrorCode::MutationFailed,
            CoreError::EmployeeNotFound { .. } => ErrorCode::EmployeeNotFound,
            CoreError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            CoreError::DataError { .. } => ErrorCode::DataError,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::EmployeeNotFound { .. } => ErrorSeverity::Info,
            CoreError::MutationFailed { .. } | CoreError::InvalidRequest { .. } => {
                ErrorSeverity::Warning
            }
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
            CoreError::DataError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Message plus what the user can do about it
    pub fn to_details(&self) -> ErrorDetails {
        let hints = match self {
            CoreError::FetchFailed { .. } => {
                vec!["The displayed list was left unchanged; retry the action.".to_string()]
            }
            CoreError::MutationFailed { .. } => vec![
                "The approval shown is the last confirmed value; toggle again to retry."
                    .to_string(),
            ],
            CoreError::EmployeeNotFound { id } => vec![format!(
                "Check that employee '{}' is listed in the employee directory.",
                id
            )],
            CoreError::InvalidRequest { .. } => Vec::new(),
            CoreError::DataError { .. } => vec![
                "Check that data.path names a JSON file with employees and transactions."
                    .to_string(),
            ],
        };

        ErrorDetails {
            code: self.code(),
            severity: self.severity(),
            message: self.to_string(),
            hints,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Feed the operation targeted, if any
    pub feed: Option<String>,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            feed: None,
            data: serde_json::json!({}),
        }
    }

    pub fn with_feed(mut self, feed: impl std::fmt::Display) -> Self {
        self.feed = Some(feed.to_string());
        self
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Logs through the `log` facade at the error's severity
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::log!(
            target: "txreview::error",
            error.severity().level(),
            "[{}] {} - operation={} feed={} data={}",
            error.code(),
            error,
            context.operation,
            context.feed.as_deref().unwrap_or("-"),
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "txreview::error",
            "{} - operation={} feed={}",
            message,
            context.operation,
            context.feed.as_deref().unwrap_or("-")
        );
    }
}

// ==================== Tests ====================
