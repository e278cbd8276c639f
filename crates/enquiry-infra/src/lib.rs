//! Enquiry Infrastructure Library
//!
//! Shared infrastructure for the enquiry service:
//! - Middleware (request ID, preflight status)
//! - Telemetry initialization
//! - Instant-message alert delivery

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "alerts")]
pub mod alerts;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{preflight_status_middleware, request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "alerts")]
pub use alerts::{AlertDispatcher, AlertError, AlertNotifier, AlertReport, WebhookAlerter};
