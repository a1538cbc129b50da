/// Error types for improvement-report
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for improvement-report operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Confidence outside 0-100% or unparseable
    #[error("Invalid confidence: {0}")]
    InvalidConfidence(String),

    /// Markdown document failed structural validation
    #[error("Report validation failed: {0}")]
    Validation(String),

    /// Report content is not fit to be stored
    #[error("Invalid report: {0}")]
    InvalidReport(String),

    /// No stored report with this id
    #[error("Report not found: {0}")]
    ReportNotFound(i64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for improvement-report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Convert ReportError to a user-friendly error message
impl ReportError {
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Database(e) => {
                format!("History database error. Please try again. Details: {}", e)
            }
            ReportError::Io(e) => {
                format!("File system error. Check paths and permissions. Details: {}", e)
            }
            ReportError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            ReportError::InvalidConfidence(value) => {
                format!("Confidence '{}' must be a percentage between 0 and 100", value)
            }
            ReportError::Validation(summary) => {
                format!("The document is not a valid improvement report: {}", summary)
            }
            ReportError::InvalidReport(reason) => {
                format!("Report was not stored: {}", reason)
            }
            ReportError::ReportNotFound(id) => {
                format!("No stored report with id {}", id)
            }
            ReportError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            ReportError::Generic(msg) => msg.clone(),
        }
    }
}
