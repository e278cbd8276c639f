//! Submission pipeline
//!
//! `Parsing -> Validating -> Notifying -> CleaningUp -> Done`, where any stage may fail
//! straight into `CleaningUp`. Mail delivery is awaited and decides the outcome; alerts
//! are spawned afterwards and never looked at again.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use chrono_tz::Tz;

use enquiry_core::formatter::{contact_notification, quote_notification};
use enquiry_core::validation::{validate_contact, validate_quote};
use enquiry_core::{AlertKind, AppError, Config, ContactForm};
use enquiry_infra::AlertDispatcher;
use enquiry_storage::ScratchStorage;

use super::extractor::extract_multipart;
use super::staging::{StagingArea, DEFAULT_DRAIN_GRACE};
use crate::services::email::Mailer;

const CONTACT_SUCCESS: &str = "Message sent successfully!";
const QUOTE_SUCCESS: &str =
    "Quote request submitted successfully! We will contact you within 24 hours.";

/// Pipeline states, logged as the run moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Parsing,
    Validating,
    Notifying,
    CleaningUp,
    Done,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            PipelineStage::Parsing => "parsing",
            PipelineStage::Validating => "validating",
            PipelineStage::Notifying => "notifying",
            PipelineStage::CleaningUp => "cleaning_up",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a successful run reports back to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: &'static str,
    pub attachments: usize,
}

/// Recipients and limits the pipeline needs from configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub quote_recipients: Vec<String>,
    pub contact_recipients: Vec<String>,
    pub display_timezone: Tz,
    pub parse_timeout: Duration,
    pub drain_grace: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quote_recipients: config.submissions.quote_recipients.clone(),
            contact_recipients: config.submissions.contact_recipients.clone(),
            display_timezone: config.submissions.display_timezone,
            parse_timeout: config.submissions.parse_timeout,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }
}

pub struct SubmissionPipeline {
    settings: PipelineSettings,
    mailer: Arc<dyn Mailer>,
    alerts: AlertDispatcher,
    scratch: Arc<dyn ScratchStorage>,
}

fn enter(stage: PipelineStage, form: AlertKind) {
    tracing::debug!(stage = %stage, form = %form, "Submission stage");
}

impl SubmissionPipeline {
    pub fn new(
        settings: PipelineSettings,
        mailer: Arc<dyn Mailer>,
        alerts: AlertDispatcher,
        scratch: Arc<dyn ScratchStorage>,
    ) -> Self {
        Self {
            settings,
            mailer,
            alerts,
            scratch,
        }
    }

    /// Run a quote request end to end. Staged files are gone when this returns.
    pub async fn submit_quote(
        &self,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<SubmissionReceipt, AppError> {
        let mut staging =
            StagingArea::new(self.scratch.clone()).with_drain_grace(self.settings.drain_grace);

        let outcome = self.run_quote(content_type, body, &mut staging).await;

        enter(PipelineStage::CleaningUp, AlertKind::Quote);
        let report = staging.cleanup().await;
        tracing::info!(
            staged = staging.len(),
            removed = report.removed,
            already_absent = report.already_absent,
            failed = report.failed,
            success = outcome.is_ok(),
            "Quote submission cleaned up"
        );

        enter(PipelineStage::Done, AlertKind::Quote);
        outcome
    }

    async fn run_quote(
        &self,
        content_type: Option<&str>,
        body: Bytes,
        staging: &mut StagingArea,
    ) -> Result<SubmissionReceipt, AppError> {
        enter(PipelineStage::Parsing, AlertKind::Quote);
        let parse_timeout = self.settings.parse_timeout;
        let parsed = tokio::time::timeout(
            parse_timeout,
            extract_multipart(content_type, body, staging),
        )
        .await;
        let extraction = match parsed {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = parse_timeout.as_secs_f64(),
                    staged = staging.len(),
                    "Multipart parsing timed out"
                );
                staging.drain().await;
                return Err(AppError::Timeout(parse_timeout));
            }
        };

        enter(PipelineStage::Validating, AlertKind::Quote);
        let quote = validate_quote(&extraction.fields)?;

        enter(PipelineStage::Notifying, AlertKind::Quote);
        let payload = quote_notification(
            &quote,
            &extraction.files,
            &self.settings.quote_recipients,
            Utc::now(),
            self.settings.display_timezone,
        );
        self.mailer.send(&payload).await?;

        tracing::info!(
            company = %quote.company,
            attachments = extraction.files.len(),
            "Quote request delivered"
        );
        drop(self.alerts.spawn(AlertKind::Quote, quote.company.clone()));

        Ok(SubmissionReceipt {
            message: QUOTE_SUCCESS,
            attachments: extraction.files.len(),
        })
    }

    /// Run a contact message end to end.
    pub async fn submit_contact(&self, form: ContactForm) -> Result<SubmissionReceipt, AppError> {
        enter(PipelineStage::Validating, AlertKind::Contact);
        let contact = validate_contact(form)?;

        enter(PipelineStage::Notifying, AlertKind::Contact);
        let payload = contact_notification(
            &contact,
            &self.settings.contact_recipients,
            Utc::now(),
            self.settings.display_timezone,
        );
        self.mailer.send(&payload).await?;

        tracing::info!(subject = %contact.subject, "Contact message delivered");
        drop(
            self.alerts
                .spawn(AlertKind::Contact, contact.display_name().to_string()),
        );

        enter(PipelineStage::Done, AlertKind::Contact);
        Ok(SubmissionReceipt {
            message: CONTACT_SUCCESS,
            attachments: 0,
        })
    }
}
