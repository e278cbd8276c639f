//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. The wrapper carries the support phone so
//! that every failure body tells the submitter who to call.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::rejection::{BytesRejection, JsonRejection},
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use enquiry_core::{AppError, ErrorMetadata, LogLevel};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Body of every submission response, success or failure
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    /// Machine-readable error code, failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl SubmissionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
        }
    }

    pub fn failure(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError are both foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub support_phone: String,
}

impl HttpAppError {
    pub fn new(error: AppError, support_phone: &str) -> Self {
        Self {
            error,
            support_phone: support_phone.to_string(),
        }
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = code, "Submission rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = code, "Submission rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = code, "Submission failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.error);

        let message = self.error.with_fallback(&self.support_phone);

        (
            status,
            Json(SubmissionResponse::failure(message, self.error.error_code())),
        )
            .into_response()
    }
}

fn body_error(status: StatusCode, detail: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(detail)
    } else {
        AppError::InvalidRequest(format!("Invalid request body: {}", detail))
    }
}

/// JSON body extractor that answers malformed bodies with a [`SubmissionResponse`]
/// instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest<Arc<AppState>> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                HttpAppError::new(
                    body_error(rejection.status(), rejection.body_text()),
                    state.support_phone(),
                )
            })?;
        Ok(ValidatedJson(inner))
    }
}

/// The complete request body, with the same error shape as [`ValidatedJson`].
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

impl FromRequest<Arc<AppState>> for RawBody {
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection: BytesRejection| {
                let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge(rejection.body_text())
                } else {
                    AppError::parse(rejection.body_text())
                };
                HttpAppError::new(error, state.support_phone())
            })?;
        Ok(RawBody(bytes))
    }
}

/// Shared 405 body for every route.
pub async fn method_not_allowed() -> (StatusCode, Json<SubmissionResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(SubmissionResponse::failure(
            "Method not allowed",
            "METHOD_NOT_ALLOWED",
        )),
    )
}
