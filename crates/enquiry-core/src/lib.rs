//! Enquiry Core Library
//!
//! Domain models, error types, configuration, validation and notification rendering
//! shared by the storage, infra and API crates.

pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{AlertConfig, BaseConfig, Config, MailConfig, SubmissionConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AlertKind, AlertOutcome, AttachmentRef, ContactForm, ContactSubmission, FieldMap,
    NotificationPayload, QuoteSubmission, StagedFile,
};
