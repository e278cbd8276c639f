//! Enquiry API Library
//!
//! HTTP handlers, the submission pipeline and application setup for the contact and
//! quote endpoints.

mod api_doc;
mod handlers;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use api_doc::ApiDoc;
pub use error::{HttpAppError, SubmissionResponse};
pub use services::email::{LazyMailer, Mailer, SmtpMailer};
pub use services::submission::{PipelineSettings, SubmissionPipeline, SubmissionReceipt};
pub use state::AppState;
