//! In-process mail and alert collaborators.

use async_trait::async_trait;
use enquiry_api::Mailer;
use enquiry_core::{AppError, NotificationPayload};
use enquiry_infra::{AlertError, AlertNotifier};
use std::sync::Mutex;

/// A mail send attempt, with attachment bytes read while the send was in progress.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub payload: NotificationPayload,
    pub attachment_contents: Vec<Vec<u8>>,
}

pub struct RecordingMailer {
    fail: bool,
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, notification: &NotificationPayload) -> Result<(), AppError> {
        let mut contents = Vec::new();
        for attachment in &notification.attachments {
            contents.push(
                tokio::fs::read(&attachment.path)
                    .await
                    .map_err(|e| AppError::delivery(e.to_string()))?,
            );
        }
        self.sent.lock().unwrap().push(SentMail {
            payload: notification.clone(),
            attachment_contents: contents,
        });

        if self.fail {
            return Err(AppError::delivery("relay unavailable"));
        }
        Ok(())
    }
}

pub struct RecordingAlerter {
    fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingAlerter {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait for the detached alert task to make `expected` calls.
    pub async fn wait_for_calls(&self, expected: usize) -> Vec<(String, String)> {
        for _ in 0..100 {
            let calls = self.calls();
            if calls.len() >= expected {
                return calls;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.calls()
    }
}

#[async_trait]
impl AlertNotifier for RecordingAlerter {
    async fn notify(&self, phone: &str, message: &str) -> Result<(), AlertError> {
        self.calls
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        if self.fail {
            return Err(AlertError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}
