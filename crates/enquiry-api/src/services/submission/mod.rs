//! Quote and contact submission handling: multipart extraction, upload staging and the
//! pipeline that ties validation, formatting, mail and alerts together.

pub mod extractor;
pub mod pipeline;
pub mod staging;

pub use extractor::{extract_multipart, Extraction};
pub use pipeline::{PipelineSettings, PipelineStage, SubmissionPipeline, SubmissionReceipt};
pub use staging::{CleanupReport, StagingArea};
