use axum::http::{Method, StatusCode};
use axum::{extract::Request, middleware::Next, response::Response};

/// Answer successful `OPTIONS` requests with `204 No Content`.
///
/// The CORS layer short-circuits preflights with `200 OK`, so this has to sit outside it.
pub async fn preflight_status_middleware(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;

    if is_options && response.status().is_success() {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }

    response
}
