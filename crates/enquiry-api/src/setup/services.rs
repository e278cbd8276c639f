//! Collaborator wiring: scratch storage, mail relay and alert webhook.

use crate::services::email::LazyMailer;
use crate::services::submission::{PipelineSettings, SubmissionPipeline};
use crate::state::AppState;
use anyhow::{Context, Result};
use enquiry_core::Config;
use enquiry_infra::AlertDispatcher;
use enquiry_storage::LocalScratch;
use std::sync::Arc;

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let scratch = LocalScratch::new(&config.submissions.scratch_dir)
        .await
        .context("Failed to prepare scratch directory")?;
    tracing::info!(
        path = %scratch.base_path().display(),
        "Scratch storage ready"
    );

    // The SMTP client is built on the first send.
    let mailer = LazyMailer::new(config.mail.clone());

    let alerts = AlertDispatcher::from_config(config).context("Failed to configure alerts")?;

    let pipeline = SubmissionPipeline::new(
        PipelineSettings::from_config(config),
        Arc::new(mailer),
        alerts,
        Arc::new(scratch),
    );

    Ok(Arc::new(AppState::new(config.clone(), pipeline)))
}
