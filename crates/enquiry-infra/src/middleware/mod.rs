//! Shared HTTP middleware

pub mod preflight;
pub mod request_id;

pub use preflight::preflight_status_middleware;
pub use request_id::{request_id_middleware, RequestId};
