//! Instant-message alerts
//!
//! Alerts are a best-effort side channel: every failure is captured in an
//! [`AlertReport`] and logged, never returned to the submitter.

mod dispatcher;
mod webhook;

pub use dispatcher::{AlertDispatcher, AlertReport};
pub use webhook::WebhookAlerter;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Alert request failed: {0}")]
    Transport(String),

    #[error("Alert endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Alert configuration error: {0}")]
    Config(String),
}

/// Delivers one text message to one phone number.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, phone: &str, message: &str) -> Result<(), AlertError>;
}
