//! Staged file naming.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const MAX_FILENAME_LENGTH: usize = 120;

/// Reduce an uploaded file name to a safe final path component.
///
/// Directory components are dropped, anything outside `[A-Za-z0-9._-]` becomes `_`,
/// and names that end up empty or made only of dots fall back to `file`.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        return "file".to_string();
    }

    sanitized
}

/// `{unix_millis}-{random}-{sanitized name}`
pub(crate) fn staged_file_name(original_name: &str, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        now.timestamp_millis(),
        &suffix[..12],
        sanitize_filename(original_name)
    )
}
