use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{AlertError, AlertNotifier};

#[derive(Debug, Serialize)]
struct AlertBody<'a> {
    phone: &'a str,
    message: &'a str,
}

/// Posts `{"phone", "message"}` JSON to a messaging gateway webhook.
#[derive(Clone)]
pub struct WebhookAlerter {
    http_client: Client,
    url: String,
}

impl WebhookAlerter {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AlertError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| {
                AlertError::Config(format!("Failed to create HTTP client for alerts: {}", e))
            })?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AlertNotifier for WebhookAlerter {
    #[tracing::instrument(skip(self, message))]
    async fn notify(&self, phone: &str, message: &str) -> Result<(), AlertError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&AlertBody { phone, message })
            .send()
            .await
            .map_err(|e| AlertError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        Err(AlertError::Rejected {
            status: status.as_u16(),
            body: body.chars().take(500).collect(),
        })
    }
}
