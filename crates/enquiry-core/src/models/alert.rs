use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Which form triggered an instant-message alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Quote,
    Contact,
}

impl Display for AlertKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AlertKind::Quote => write!(f, "quote"),
            AlertKind::Contact => write!(f, "contact"),
        }
    }
}

impl AlertKind {
    /// Alert text sent to every configured phone.
    pub fn message(&self, from: &str, inbox: &str) -> String {
        match self {
            AlertKind::Quote => {
                format!("🔔 NEW QUOTE REQUEST\nFrom: {}\nCheck: {}", from, inbox)
            }
            AlertKind::Contact => format!("📞 NEW CONTACT\nFrom: {}\nCheck: {}", from, inbox),
        }
    }
}

/// Result of one alert attempt. Failures are recorded, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOutcome {
    pub phone: String,
    pub delivered: bool,
    pub error: Option<String>,
}

impl AlertOutcome {
    pub fn delivered(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            delivered: true,
            error: None,
        }
    }

    pub fn failed(phone: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            delivered: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_alert_names_company_and_inbox() {
        let text = AlertKind::Quote.message("Acme", "sales@example.com");
        assert_eq!(
            text,
            "🔔 NEW QUOTE REQUEST\nFrom: Acme\nCheck: sales@example.com"
        );
    }

    #[test]
    fn contact_alert_uses_contact_banner() {
        let text = AlertKind::Contact.message("Jo", "info@example.com");
        assert!(text.starts_with("📞 NEW CONTACT"));
        assert!(text.contains("From: Jo"));
    }
}
