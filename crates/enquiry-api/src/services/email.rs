//! Mail relay collaborator.
//!
//! [`SmtpMailer`] turns a [`NotificationPayload`] into a MIME message and hands it to the
//! relay. [`LazyMailer`] builds that client on first use and shares it afterwards, so a
//! process with missing credentials still starts and reports the problem per request.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tokio::sync::OnceCell;

use enquiry_core::{AppError, AttachmentRef, MailConfig, NotificationPayload};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Sends a rendered notification. A failure is fatal to the submission.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: &NotificationPayload) -> Result<(), AppError>;
}

/// SMTP relay client
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, AppError> {
        let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) else {
            return Err(AppError::delivery("Email configuration missing"));
        };
        let from_address = config.smtp_from.as_deref().unwrap_or(user);
        let from: Mailbox = from_address
            .parse()
            .map_err(|e| AppError::delivery(format!("Invalid SMTP_FROM: {}", e)))?;
        let credentials = Credentials::new(user.clone(), password.clone());

        let transport = if config.smtp_tls {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::delivery(format!("Invalid SMTP relay: {}", e)))?;
            tracing::info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                "Mail client initialized (SMTP with STARTTLS)"
            );
            builder
                .port(config.smtp_port)
                .credentials(credentials)
                .timeout(Some(SMTP_TIMEOUT))
                .build()
        } else {
            tracing::info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                "Mail client initialized (SMTP)"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .credentials(credentials)
                .timeout(Some(SMTP_TIMEOUT))
                .build()
        };

        Ok(Self { transport, from })
    }

    /// Assemble the MIME message, reading every attachment from its staged path.
    pub async fn build_message(
        &self,
        notification: &NotificationPayload,
    ) -> Result<Message, AppError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(notification.subject.clone());

        for recipient in &notification.recipients {
            let mailbox: Mailbox = recipient.parse().map_err(|e| {
                AppError::delivery(format!("Invalid recipient {}: {}", recipient, e))
            })?;
            builder = builder.to(mailbox);
        }

        if let Some(reply_to) = &notification.reply_to {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => tracing::debug!(reply_to = %reply_to, error = %e, "Skipping reply-to"),
            }
        }

        let html = SinglePart::html(notification.html_body.clone());
        let message = if notification.attachments.is_empty() {
            builder.singlepart(html)
        } else {
            let mut parts = MultiPart::mixed().singlepart(html);
            for attachment in &notification.attachments {
                parts = parts.singlepart(attachment_part(attachment).await?);
            }
            builder.multipart(parts)
        };

        message.map_err(|e| AppError::delivery(format!("Failed to build message: {}", e)))
    }
}

async fn attachment_part(attachment: &AttachmentRef) -> Result<SinglePart, AppError> {
    let body = tokio::fs::read(&attachment.path).await.map_err(|e| {
        AppError::delivery(format!(
            "Failed to read attachment {}: {}",
            attachment.filename, e
        ))
    })?;

    let content_type = match attachment.content_type.as_deref().map(ContentType::parse) {
        Some(Ok(content_type)) => content_type,
        _ => ContentType::parse(FALLBACK_CONTENT_TYPE)
            .map_err(|e| AppError::delivery(format!("Invalid content type: {}", e)))?,
    };

    Ok(Attachment::new(attachment.filename.clone()).body(body, content_type))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: &NotificationPayload) -> Result<(), AppError> {
        if notification.recipients.is_empty() {
            return Err(AppError::delivery("No recipients configured"));
        }

        let message = self.build_message(notification).await?;
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::delivery(e.to_string()))?;

        tracing::info!(
            recipients = notification.recipients.len(),
            attachments = notification.attachments.len(),
            "Notification mail sent"
        );
        Ok(())
    }
}

/// Builds the [`SmtpMailer`] on first send and reuses it for every later request.
///
/// Concurrent first sends share one initialization. A failed construction is not cached,
/// so every request without credentials reports the same delivery error.
pub struct LazyMailer {
    config: MailConfig,
    client: OnceCell<SmtpMailer>,
}

impl LazyMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }
}

#[async_trait]
impl Mailer for LazyMailer {
    async fn send(&self, notification: &NotificationPayload) -> Result<(), AppError> {
        let client = self
            .client
            .get_or_try_init(|| async { SmtpMailer::from_config(&self.config) })
            .await?;
        client.send(notification).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            smtp_user: Some("forms@example.com".to_string()),
            smtp_password: Some("secret".to_string()),
            smtp_from: None,
            smtp_tls: false,
        }
    }

    fn payload(attachments: Vec<AttachmentRef>) -> NotificationPayload {
        NotificationPayload {
            recipients: vec!["sales@example.com".to_string(), "ops@example.com".to_string()],
            subject: "Quote: Acme - bracket".to_string(),
            html_body: "<p>hello</p>".to_string(),
            reply_to: Some("jo@acme.com".to_string()),
            attachments,
        }
    }

    #[tokio::test]
    async fn missing_credentials_surface_as_delivery_error() {
        let mut config = mail_config();
        config.smtp_password = None;
        let mailer = LazyMailer::new(config);

        let err = mailer.send(&payload(vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::Delivery(ref msg) if msg == "Email configuration missing"));
        assert!(!mailer.is_initialized());
    }

    #[tokio::test]
    async fn message_carries_recipients_and_reply_to() {
        let mailer = SmtpMailer::from_config(&mail_config()).unwrap();
        let message = mailer.build_message(&payload(vec![])).await.unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: forms@example.com"));
        assert!(raw.contains("sales@example.com"));
        assert!(raw.contains("ops@example.com"));
        assert!(raw.contains("Reply-To: jo@acme.com"));
        assert!(raw.contains("Subject: Quote: Acme - bracket"));
    }

    #[tokio::test]
    async fn attachments_use_original_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1700000000000-abc-drawing.pdf");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let mailer = SmtpMailer::from_config(&mail_config()).unwrap();
        let message = mailer
            .build_message(&payload(vec![AttachmentRef {
                filename: "drawing.pdf".to_string(),
                path,
                content_type: Some("application/pdf".to_string()),
            }]))
            .await
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("filename=\"drawing.pdf\""));
        assert!(raw.contains("application/pdf"));
    }

    #[tokio::test]
    async fn unreadable_attachment_fails_delivery() {
        let mailer = SmtpMailer::from_config(&mail_config()).unwrap();
        let result = mailer
            .build_message(&payload(vec![AttachmentRef {
                filename: "gone.pdf".to_string(),
                path: PathBuf::from("/nonexistent/gone.pdf"),
                content_type: None,
            }]))
            .await;

        assert!(matches!(result, Err(AppError::Delivery(_))));
    }
}
