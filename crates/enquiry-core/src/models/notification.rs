use std::path::PathBuf;

use super::submission::StagedFile;

/// A file to attach to the outgoing mail. References a staged path, so it is only
/// usable until the submission's cleanup runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub filename: String,
    pub path: PathBuf,
    pub content_type: Option<String>,
}

impl From<&StagedFile> for AttachmentRef {
    fn from(file: &StagedFile) -> Self {
        Self {
            filename: file.original_name.clone(),
            path: file.path.clone(),
            content_type: file.content_type.clone(),
        }
    }
}

/// Everything the mail collaborator needs, minus the sender which the mailer owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub reply_to: Option<String>,
    pub attachments: Vec<AttachmentRef>,
}
