//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::SubmissionResponse;
use crate::handlers;
use crate::setup::routes::health;
use enquiry_core::ContactForm;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Enquiry API",
        version = "0.1.0",
        description = "Contact and quote request intake"
    ),
    paths(
        handlers::contact::submit_contact,
        handlers::quote::submit_quote,
        handlers::quote::quote_status_page,
        health::health_check,
    ),
    components(schemas(ContactForm, SubmissionResponse, health::HealthResponse)),
    tags(
        (name = "submissions", description = "Website form submissions"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
