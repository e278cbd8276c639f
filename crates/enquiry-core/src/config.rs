//! Configuration module
//!
//! Configuration is read once from the environment (a `.env` file is honoured) and
//! then shared immutably. Mail credentials are optional here; the mail
//! client is built lazily and reports missing credentials per request.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

// Common constants
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SUPPORT_PHONE: &str = "+91 9150400011";
const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
const PARSE_TIMEOUT_SECS: u64 = 30;
const ALERT_TIMEOUT_SECS: u64 = 10;
const MAX_BODY_MB: usize = 25;

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub service_name: String,
    pub max_body_bytes: usize,
}

/// Mail relay settings. Credentials stay optional until first use.
#[derive(Clone, Debug)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

/// Instant-message alert webhook settings
#[derive(Clone, Debug)]
pub struct AlertConfig {
    /// Unset disables alerts entirely
    pub webhook_url: Option<String>,
    pub phone_numbers: Vec<String>,
    /// Mailbox named in the alert text
    pub inbox: Option<String>,
    pub timeout: Duration,
}

/// Submission handling settings
#[derive(Clone, Debug)]
pub struct SubmissionConfig {
    pub quote_recipients: Vec<String>,
    pub contact_recipients: Vec<String>,
    pub support_phone: String,
    pub display_timezone: Tz,
    pub parse_timeout: Duration,
    pub scratch_dir: PathBuf,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub mail: MailConfig,
    pub alerts: AlertConfig,
    pub submissions: SubmissionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_body_mb = env::var("MAX_BODY_MB")
            .unwrap_or_else(|_| MAX_BODY_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_BODY_MB);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins: parse_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string())),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "enquiry-api".to_string()),
            max_body_bytes: body_limit_bytes(max_body_mb)?,
        };

        let smtp_user = non_empty("EMAIL_USER").or_else(|| non_empty("SMTP_USER"));
        let mail = MailConfig {
            smtp_host: non_empty("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0)
                .unwrap_or(DEFAULT_SMTP_PORT),
            smtp_from: non_empty("SMTP_FROM").or_else(|| smtp_user.clone()),
            smtp_user,
            smtp_password: non_empty("EMAIL_PASS").or_else(|| non_empty("SMTP_PASSWORD")),
            smtp_tls: env::var("SMTP_TLS")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
        };

        let alerts = AlertConfig {
            webhook_url: non_empty("WHATSAPP_WEBHOOK_URL"),
            phone_numbers: parse_list(&env::var("ALERT_PHONE_NUMBERS").unwrap_or_default()),
            inbox: non_empty("ALERT_INBOX"),
            timeout: Duration::from_secs(
                env::var("ALERT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(ALERT_TIMEOUT_SECS),
            ),
        };

        let timezone_name =
            non_empty("DISPLAY_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let display_timezone: Tz = timezone_name
            .parse()
            .map_err(|_| anyhow::anyhow!("DISPLAY_TIMEZONE '{}' is not a known IANA zone", timezone_name))?;

        let submissions = SubmissionConfig {
            quote_recipients: parse_list(&env::var("QUOTE_RECIPIENTS").unwrap_or_default()),
            contact_recipients: parse_list(&env::var("CONTACT_RECIPIENTS").unwrap_or_default()),
            support_phone: non_empty("SUPPORT_PHONE")
                .unwrap_or_else(|| DEFAULT_SUPPORT_PHONE.to_string()),
            display_timezone,
            parse_timeout: Duration::from_secs(
                env::var("PARSE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|&s: &u64| s > 0)
                    .unwrap_or(PARSE_TIMEOUT_SECS),
            ),
            scratch_dir: non_empty("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
        };

        let config = Config {
            base,
            mail,
            alerts,
            submissions,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.submissions.quote_recipients.is_empty() {
            return Err(anyhow::anyhow!("QUOTE_RECIPIENTS must list at least one address"));
        }

        if self.submissions.contact_recipients.is_empty() {
            return Err(anyhow::anyhow!(
                "CONTACT_RECIPIENTS must list at least one address"
            ));
        }

        if self.alerts.webhook_url.is_some() && self.alerts.phone_numbers.is_empty() {
            return Err(anyhow::anyhow!(
                "WHATSAPP_WEBHOOK_URL is set but ALERT_PHONE_NUMBERS is empty"
            ));
        }

        if self.base.max_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_BODY_MB must be greater than zero"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn service_name(&self) -> &str {
        &self.base.service_name
    }

    pub fn support_phone(&self) -> &str {
        &self.submissions.support_phone
    }

    /// Mailbox named in alert texts: explicit setting, else the first quote recipient.
    pub fn alert_inbox(&self) -> String {
        self.alerts
            .inbox
            .clone()
            .or_else(|| self.submissions.quote_recipients.first().cloned())
            .unwrap_or_default()
    }
}

/// Megabytes to bytes, rejecting limits that do not fit in `usize`.
pub fn body_limit_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_BODY_MB {} is too large", megabytes))
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            base: BaseConfig {
                server_port: 8080,
                environment: "development".to_string(),
                cors_origins: vec!["*".to_string()],
                service_name: "enquiry-api".to_string(),
                max_body_bytes: 1024,
            },
            mail: MailConfig {
                smtp_host: DEFAULT_SMTP_HOST.to_string(),
                smtp_port: DEFAULT_SMTP_PORT,
                smtp_user: None,
                smtp_password: None,
                smtp_from: None,
                smtp_tls: true,
            },
            alerts: AlertConfig {
                webhook_url: None,
                phone_numbers: vec![],
                inbox: None,
                timeout: Duration::from_secs(1),
            },
            submissions: SubmissionConfig {
                quote_recipients: vec!["sales@example.com".to_string()],
                contact_recipients: vec!["info@example.com".to_string()],
                support_phone: DEFAULT_SUPPORT_PHONE.to_string(),
                display_timezone: chrono_tz::Asia::Kolkata,
                parse_timeout: Duration::from_secs(30),
                scratch_dir: env::temp_dir(),
            },
        }
    }

    #[test]
    fn parse_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(" a@x.com, ,b@x.com ,"),
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn body_limit_rejects_overflow() {
        assert_eq!(body_limit_bytes(25).unwrap(), 25 * 1024 * 1024);
        assert!(body_limit_bytes(usize::MAX).is_err());
        assert!(body_limit_bytes(usize::MAX / 1024).is_err());
    }

    #[test]
    fn validate_requires_recipients() {
        let mut config = sample();
        assert!(config.validate().is_ok());

        config.submissions.quote_recipients.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn webhook_without_numbers_is_rejected() {
        let mut config = sample();
        config.alerts.webhook_url = Some("https://hooks.example.com/wa".to_string());
        assert!(config.validate().is_err());

        config.alerts.phone_numbers = vec!["918800000000".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn alert_inbox_falls_back_to_first_quote_recipient() {
        let mut config = sample();
        assert_eq!(config.alert_inbox(), "sales@example.com");

        config.alerts.inbox = Some("desk@example.com".to_string());
        assert_eq!(config.alert_inbox(), "desk@example.com");
    }
}
