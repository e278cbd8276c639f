//! Application state shared by every handler.

use enquiry_core::Config;

use crate::services::submission::SubmissionPipeline;

pub struct AppState {
    pub config: Config,
    pub pipeline: SubmissionPipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: SubmissionPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Number appended to every failure message.
    pub fn support_phone(&self) -> &str {
        self.config.support_phone()
    }
}
