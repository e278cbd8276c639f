//! Error types module
//!
//! All failures a submission can end in are unified under [`AppError`]. Each variant
//! describes its own HTTP presentation through [`ErrorMetadata`], so handlers never
//! decide status codes themselves.
//!
//! Webhook alert failures are best-effort and live in
//! `enquiry-infra` as `AlertError`, which never converts into `AppError`.

use std::time::Duration;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client faults worth noticing (bad bodies, timeouts)
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

    /// Whether the submitter can fix this by correcting the form
    fn is_user_correctable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Invalid email: {0:?}")]
    InvalidEmail(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Parsing exceeded {0:?}")]
    Timeout(Duration),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Mail delivery failed: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a parse failure.
    pub fn parse(message: impl Into<String>) -> Self {
        AppError::Parse(message.into())
    }

    /// Shorthand for a mail delivery failure.
    pub fn delivery(message: impl Into<String>) -> Self {
        AppError::Delivery(message.into())
    }

    /// Human fallback instruction appended to every user-visible failure.
    pub fn with_fallback(&self, support_phone: &str) -> String {
        if self.is_user_correctable() {
            format!(
                "{}. Please check the form and try again, or call {}",
                self.client_message(),
                support_phone
            )
        } else {
            format!(
                "{}. Please try again or call {}",
                self.client_message(),
                support_phone
            )
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Validation { .. }
            | AppError::InvalidEmail(_)
            | AppError::InvalidRequest(_)
            | AppError::Parse(_) => 400,
            AppError::Timeout(_) => 408,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Delivery(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::InvalidEmail(_) => "INVALID_EMAIL",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::Parse(_) => "PARSE_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Delivery(_) => "DELIVERY_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            AppError::Validation { .. }
                | AppError::InvalidEmail(_)
                | AppError::InvalidRequest(_)
                | AppError::PayloadTooLarge(_)
        )
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation { missing } => {
                format!("Missing required fields: {}", missing.join(", "))
            }
            AppError::InvalidEmail(_) => "Invalid email".to_string(),
            AppError::InvalidRequest(msg) => msg.clone(),
            AppError::Parse(msg) => format!("Could not read the submitted form ({})", msg),
            AppError::Timeout(_) => "The submission took too long to process".to_string(),
            AppError::PayloadTooLarge(_) => "The submission is too large".to_string(),
            AppError::Delivery(_) => "Failed to send".to_string(),
            AppError::Internal(_) => "Failed to submit".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation { .. } | AppError::InvalidEmail(_) | AppError::InvalidRequest(_) => {
                LogLevel::Debug
            }
            AppError::Parse(_) | AppError::Timeout(_) | AppError::PayloadTooLarge(_) => {
                LogLevel::Warn
            }
            AppError::Delivery(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}
