//! Test helpers: build the real router around in-process collaborators.
//!
//! Run from workspace root: `cargo test -p enquiry-api`.

#![allow(dead_code)]

pub mod fakes;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use enquiry_api::setup::routes;
use enquiry_api::{AppState, PipelineSettings, SubmissionPipeline};
use enquiry_core::{AlertConfig, BaseConfig, Config, MailConfig, SubmissionConfig};
use enquiry_infra::AlertDispatcher;
use enquiry_storage::LocalScratch;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub use fakes::{RecordingAlerter, RecordingMailer};

pub const SUPPORT_PHONE: &str = "+91 9150400011";
pub const ALERT_PHONES: [&str; 3] = ["918800000001", "918800000002", "918800000003"];

/// Test application: server, fakes and the scratch directory they share.
pub struct TestApp {
    pub server: TestServer,
    pub mailer: Arc<RecordingMailer>,
    pub alerter: Arc<RecordingAlerter>,
    pub scratch_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files left in the scratch directory.
    pub fn residual_files(&self) -> usize {
        std::fs::read_dir(self.scratch_dir.path())
            .expect("scratch dir readable")
            .count()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TestOptions {
    pub mail_fails: bool,
    pub alerts_fail: bool,
}

pub fn create_test_config(scratch: &Path) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            service_name: "enquiry-api".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        },
        mail: MailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: false,
        },
        alerts: AlertConfig {
            webhook_url: None,
            phone_numbers: ALERT_PHONES.iter().map(|p| p.to_string()).collect(),
            inbox: Some("sales@example.com".to_string()),
            timeout: Duration::from_secs(1),
        },
        submissions: SubmissionConfig {
            quote_recipients: vec!["sales@example.com".to_string()],
            contact_recipients: vec!["info@example.com".to_string()],
            support_phone: SUPPORT_PHONE.to_string(),
            display_timezone: chrono_tz::Asia::Kolkata,
            parse_timeout: Duration::from_secs(30),
            scratch_dir: scratch.to_path_buf(),
        },
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let scratch_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(scratch_dir.path());

    let scratch = LocalScratch::new(scratch_dir.path())
        .await
        .expect("Failed to create scratch storage");
    let mailer = Arc::new(RecordingMailer::new(options.mail_fails));
    let alerter = Arc::new(RecordingAlerter::new(options.alerts_fail));
    let alerts = AlertDispatcher::new(
        alerter.clone(),
        config.alerts.phone_numbers.clone(),
        config.alert_inbox(),
    );

    let pipeline = SubmissionPipeline::new(
        PipelineSettings::from_config(&config),
        mailer.clone(),
        alerts,
        Arc::new(scratch),
    );
    let state = Arc::new(AppState::new(config.clone(), pipeline));
    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        mailer,
        alerter,
        scratch_dir,
    }
}

/// The five required quote fields, optionally without one of them.
pub fn quote_form(omit: Option<&str>) -> MultipartForm {
    let fields = [
        ("company", "Acme"),
        ("contact_person", "Jo"),
        ("email", "jo@acme.com"),
        ("component_type", "bracket"),
        ("description", "need 10"),
    ];
    fields
        .into_iter()
        .filter(|(name, _)| Some(*name) != omit)
        .fold(MultipartForm::new(), |form, (name, value)| {
            form.add_text(name, value)
        })
}

pub fn file_part(name: &str, content: &'static [u8]) -> Part {
    Part::bytes(bytes::Bytes::from_static(content))
        .file_name(name.to_string())
        .mime_type("application/pdf")
}
