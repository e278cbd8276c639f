use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Html,
    Json,
};

use crate::error::{HttpAppError, RawBody, SubmissionResponse};
use crate::state::AppState;

const STATUS_PAGE: &str = include_str!("../../static/quote_status.html");

#[utoipa::path(
    post,
    path = "/submitQuote",
    tag = "submissions",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Quote request delivered", body = SubmissionResponse),
        (status = 400, description = "Malformed body or missing fields", body = SubmissionResponse),
        (status = 405, description = "Method not allowed", body = SubmissionResponse),
        (status = 408, description = "Parsing took too long", body = SubmissionResponse),
        (status = 413, description = "Body too large", body = SubmissionResponse),
        (status = 500, description = "Mail delivery failed", body = SubmissionResponse)
    )
)]
#[tracing::instrument(skip(state, headers, body), fields(body_bytes = body.0.len()))]
pub async fn submit_quote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: RawBody,
) -> Result<Json<SubmissionResponse>, HttpAppError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

    let receipt = state
        .pipeline
        .submit_quote(content_type, body.0)
        .await
        .map_err(|e| HttpAppError::new(e, state.support_phone()))?;

    Ok(Json(SubmissionResponse::success(receipt.message)))
}

/// Static page confirming the endpoint is reachable.
#[utoipa::path(
    get,
    path = "/submitQuote",
    tag = "submissions",
    responses((status = 200, description = "Endpoint status page", body = String, content_type = "text/html"))
)]
pub async fn quote_status_page() -> Html<&'static str> {
    Html(STATUS_PAGE)
}
