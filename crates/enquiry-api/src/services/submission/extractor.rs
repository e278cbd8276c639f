//! Multipart field/file extraction from a buffered request body.

use std::convert::Infallible;

use bytes::Bytes;

use enquiry_core::{AppError, FieldMap, StagedFile};

use super::staging::StagingArea;

/// Text fields and staged files recovered from one multipart body
#[derive(Debug, Default)]
pub struct Extraction {
    pub fields: FieldMap,
    pub files: Vec<StagedFile>,
}

/// Parse `body` as `multipart/form-data`, staging file parts as they are discovered.
///
/// Each file part's bytes are forwarded to its own sink without waiting for the write,
/// so a slow disk never holds up discovery of the next part. Returns only after the
/// parser has seen every part and every sink has confirmed its write.
///
/// An empty body is rejected before the parser is constructed.
pub async fn extract_multipart(
    content_type: Option<&str>,
    body: Bytes,
    staging: &mut StagingArea,
) -> Result<Extraction, AppError> {
    if body.is_empty() {
        return Err(AppError::parse("empty body"));
    }

    let content_type = content_type.ok_or_else(|| AppError::parse("missing content type"))?;
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| AppError::parse(format!("invalid multipart boundary: {}", e)))?;

    let body_len = body.len();
    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut fields = FieldMap::new();
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::parse(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match file_name {
            // Browsers send an empty file input as a nameless file part.
            Some(file_name) if file_name.is_empty() => {
                tracing::debug!(field = %name, "Skipping empty file input");
            }
            Some(file_name) => {
                let content_type = field.content_type().map(|mime| mime.to_string());
                let writer = staging.dispatch(&name, &file_name, content_type);
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::parse(e.to_string()))?
                {
                    if !writer.send(chunk) {
                        // Sink already failed; settle will report it.
                        break;
                    }
                }
                writer.finish();
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::parse(e.to_string()))?;
                fields.insert(name, value);
            }
        }
    }

    tracing::debug!(
        body_bytes = body_len,
        fields = fields.len(),
        files = staging.len(),
        "Multipart body parsed, waiting for staged writes"
    );

    let files = staging.settle().await?;
    Ok(Extraction { fields, files })
}
