use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;

use enquiry_core::{AlertKind, AlertOutcome, Config};

use super::{AlertError, AlertNotifier, WebhookAlerter};

/// Outcomes of one alert fan-out
#[derive(Debug, Clone)]
pub struct AlertReport {
    pub kind: AlertKind,
    pub outcomes: Vec<AlertOutcome>,
}

impl AlertReport {
    pub fn delivered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.delivered).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.delivered_count()
    }
}

/// Sends one alert per configured phone number.
#[derive(Clone)]
pub struct AlertDispatcher {
    notifier: Option<Arc<dyn AlertNotifier>>,
    phone_numbers: Arc<[String]>,
    inbox: String,
}

impl AlertDispatcher {
    pub fn new(
        notifier: Arc<dyn AlertNotifier>,
        phone_numbers: Vec<String>,
        inbox: impl Into<String>,
    ) -> Self {
        Self {
            notifier: Some(notifier),
            phone_numbers: phone_numbers.into(),
            inbox: inbox.into(),
        }
    }

    /// A dispatcher that never sends anything.
    pub fn disabled() -> Self {
        Self {
            notifier: None,
            phone_numbers: Arc::from(Vec::new()),
            inbox: String::new(),
        }
    }

    /// Webhook-backed dispatcher, or a disabled one when no webhook URL is configured.
    pub fn from_config(config: &Config) -> Result<Self, AlertError> {
        let Some(url) = config.alerts.webhook_url.as_deref() else {
            tracing::info!("Alert webhook not configured, instant-message alerts disabled");
            return Ok(Self::disabled());
        };

        let alerter = WebhookAlerter::new(url, config.alerts.timeout)?;
        tracing::info!(
            recipients = config.alerts.phone_numbers.len(),
            "Alert webhook configured"
        );
        Ok(Self::new(
            Arc::new(alerter),
            config.alerts.phone_numbers.clone(),
            config.alert_inbox(),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some() && !self.phone_numbers.is_empty()
    }

    /// Notify every phone concurrently and collect the outcomes. Never fails.
    pub async fn dispatch(&self, kind: AlertKind, from: &str) -> AlertReport {
        let Some(notifier) = self.notifier.as_ref() else {
            return AlertReport {
                kind,
                outcomes: Vec::new(),
            };
        };

        let message = kind.message(from, &self.inbox);
        let sends = self.phone_numbers.iter().map(|phone| {
            let message = &message;
            async move {
                match notifier.notify(phone, message).await {
                    Ok(()) => AlertOutcome::delivered(phone.as_str()),
                    Err(e) => {
                        tracing::warn!(phone = %phone, kind = %kind, error = %e, "Alert delivery failed");
                        AlertOutcome::failed(phone.as_str(), e.to_string())
                    }
                }
            }
        });

        AlertReport {
            kind,
            outcomes: join_all(sends).await,
        }
    }

    /// Fire-and-forget variant of [`dispatch`](Self::dispatch).
    ///
    /// The returned handle may be dropped; the task keeps running and logs its own report.
    pub fn spawn(&self, kind: AlertKind, from: String) -> JoinHandle<AlertReport> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let report = dispatcher.dispatch(kind, &from).await;
            if !report.outcomes.is_empty() {
                tracing::info!(
                    kind = %report.kind,
                    delivered = report.delivered_count(),
                    failed = report.failed_count(),
                    "Alerts dispatched"
                );
            }
            report
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fails for phone numbers starting with `0`.
    #[derive(Default)]
    struct FlakyNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl AlertNotifier for FlakyNotifier {
        async fn notify(&self, phone: &str, message: &str) -> Result<(), AlertError> {
            if phone.starts_with('0') {
                return Err(AlertError::Transport("connection refused".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((phone.to_string(), message.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_others() {
        let notifier = Arc::new(FlakyNotifier::default());
        let dispatcher = AlertDispatcher::new(
            notifier.clone(),
            vec!["0111".to_string(), "9222".to_string(), "9333".to_string()],
            "sales@example.com",
        );

        let report = dispatcher.dispatch(AlertKind::Quote, "Acme").await;

        assert_eq!(report.delivered_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.outcomes[0].phone, "0111");
        assert!(!report.outcomes[0].delivered);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].1.contains("From: Acme"));
        assert!(sent[0].1.contains("Check: sales@example.com"));
    }

    #[tokio::test]
    async fn disabled_dispatcher_sends_nothing() {
        let dispatcher = AlertDispatcher::disabled();
        assert!(!dispatcher.is_enabled());

        let report = dispatcher
            .spawn(AlertKind::Contact, "Jo".to_string())
            .await
            .unwrap();
        assert!(report.outcomes.is_empty());
    }
}
