use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use utoipa::ToSchema;

/// Named text fields of a multipart body. Later parts with the same name overwrite
/// earlier ones.
pub type FieldMap = HashMap<String, String>;

/// An uploaded file written to scratch storage for the lifetime of one submission.
///
/// The path is only valid until the owning pipeline run cleans up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub path: PathBuf,
    pub field_name: String,
    pub size_bytes: u64,
}

/// Raw contact form body as posted by the website.
///
/// Every field is optional at this stage so that an incomplete form becomes a
/// validation error listing the missing names instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A contact submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Name shown in alerts: the company when given, else the person.
    pub fn display_name(&self) -> &str {
        self.company.as_deref().unwrap_or(&self.name)
    }
}

/// A quote request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSubmission {
    pub company: String,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub component_type: String,
    pub quantity: Option<String>,
    pub material: Option<String>,
    pub timeline: Option<String>,
    pub description: String,
}
