use std::sync::Arc;

use axum::{extract::State, Json};
use enquiry_core::ContactForm;

use crate::error::{HttpAppError, SubmissionResponse, ValidatedJson};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/submitContact",
    tag = "submissions",
    request_body = ContactForm,
    responses(
        (status = 200, description = "Message delivered", body = SubmissionResponse),
        (status = 400, description = "Missing or invalid fields", body = SubmissionResponse),
        (status = 405, description = "Method not allowed", body = SubmissionResponse),
        (status = 500, description = "Mail delivery failed", body = SubmissionResponse)
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ValidatedJson(form): ValidatedJson<ContactForm>,
) -> Result<Json<SubmissionResponse>, HttpAppError> {
    let receipt = state
        .pipeline
        .submit_contact(form)
        .await
        .map_err(|e| HttpAppError::new(e, state.support_phone()))?;

    Ok(Json(SubmissionResponse::success(receipt.message)))
}
