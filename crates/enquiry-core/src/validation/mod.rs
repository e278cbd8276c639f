//! Submission validation
//!
//! Pure checks: required-field presence and email shape. Validation fails closed, a
//! single missing field or malformed address rejects the whole submission.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;
use crate::models::{ContactForm, ContactSubmission, FieldMap, QuoteSubmission};

/// Required multipart fields of a quote request, in reporting order.
pub const QUOTE_REQUIRED_FIELDS: [&str; 5] = [
    "company",
    "contact_person",
    "email",
    "component_type",
    "description",
];

/// Required JSON fields of a contact form, in reporting order.
pub const CONTACT_REQUIRED_FIELDS: [&str; 4] = ["name", "email", "subject", "message"];

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// `local-part@domain.tld`: no whitespace anywhere, exactly one `@`, and a dot after it.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Blank values count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Names from `required` whose value is absent or blank, in `required` order.
pub fn missing_fields<'a, 'v, F>(required: &[&'a str], lookup: F) -> Vec<&'a str>
where
    F: Fn(&str) -> Option<&'v str>,
{
    required
        .iter()
        .copied()
        .filter(|name| present(lookup(name)).is_none())
        .collect()
}

fn reject_missing(missing: Vec<&str>) -> Result<(), AppError> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::Validation {
        missing: missing.into_iter().map(str::to_string).collect(),
    })
}

fn check_email(email: &str) -> Result<(), AppError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::InvalidEmail(email.to_string()))
    }
}

fn optional(value: Option<&String>) -> Option<String> {
    present(value.map(String::as_str)).map(str::to_string)
}

fn required(fields: &FieldMap, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

/// Validate the fields extracted from a quote request body.
pub fn validate_quote(fields: &FieldMap) -> Result<QuoteSubmission, AppError> {
    reject_missing(missing_fields(&QUOTE_REQUIRED_FIELDS, |name| {
        fields.get(name).map(String::as_str)
    }))?;

    let email = required(fields, "email");
    check_email(&email)?;

    Ok(QuoteSubmission {
        company: required(fields, "company"),
        contact_person: required(fields, "contact_person"),
        email,
        phone: optional(fields.get("phone")),
        component_type: required(fields, "component_type"),
        quantity: optional(fields.get("quantity")),
        material: optional(fields.get("material")),
        timeline: optional(fields.get("timeline")),
        description: required(fields, "description"),
    })
}

/// Validate a posted contact form.
pub fn validate_contact(form: ContactForm) -> Result<ContactSubmission, AppError> {
    reject_missing(missing_fields(&CONTACT_REQUIRED_FIELDS, |name| match name {
        "name" => form.name.as_deref(),
        "email" => form.email.as_deref(),
        "subject" => form.subject.as_deref(),
        "message" => form.message.as_deref(),
        _ => None,
    }))?;

    let email = form.email.unwrap_or_default();
    check_email(&email)?;

    Ok(ContactSubmission {
        name: form.name.unwrap_or_default(),
        company: optional(form.company.as_ref()),
        email,
        phone: optional(form.phone.as_ref()),
        subject: form.subject.unwrap_or_default(),
        message: form.message.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_fields() -> FieldMap {
        [
            ("company", "Acme"),
            ("contact_person", "Jo"),
            ("email", "jo@acme.com"),
            ("component_type", "bracket"),
            ("description", "need 10"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("@b.com"));
    }

    #[test]
    fn complete_quote_is_accepted() {
        let quote = validate_quote(&quote_fields()).unwrap();
        assert_eq!(quote.company, "Acme");
        assert_eq!(quote.description, "need 10");
        assert_eq!(quote.quantity, None);
    }

    #[test]
    fn quote_missing_description_is_rejected() {
        let mut fields = quote_fields();
        fields.remove("description");

        match validate_quote(&fields) {
            Err(AppError::Validation { missing }) => assert_eq!(missing, vec!["description"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let mut fields = quote_fields();
        fields.insert("company".to_string(), "   ".to_string());
        fields.insert("email".to_string(), String::new());

        match validate_quote(&fields) {
            Err(AppError::Validation { missing }) => {
                assert_eq!(missing, vec!["company", "email"])
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn quote_with_malformed_email_is_rejected() {
        let mut fields = quote_fields();
        fields.insert("email".to_string(), "jo@acme".to_string());
        assert!(matches!(
            validate_quote(&fields),
            Err(AppError::InvalidEmail(_))
        ));
    }

    #[test]
    fn blank_optional_quote_fields_become_none() {
        let mut fields = quote_fields();
        fields.insert("material".to_string(), " ".to_string());
        fields.insert("quantity".to_string(), "500".to_string());

        let quote = validate_quote(&fields).unwrap();
        assert_eq!(quote.material, None);
        assert_eq!(quote.quantity.as_deref(), Some("500"));
    }

    #[test]
    fn contact_reports_every_missing_field() {
        let form = ContactForm {
            email: Some("jo@acme.com".to_string()),
            ..Default::default()
        };
        match validate_contact(form) {
            Err(AppError::Validation { missing }) => {
                assert_eq!(missing, vec!["name", "subject", "message"])
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn contact_is_accepted() {
        let form = ContactForm {
            name: Some("Jo".to_string()),
            company: Some(String::new()),
            email: Some("jo@acme.com".to_string()),
            phone: None,
            subject: Some("Hello".to_string()),
            message: Some("Line one\nLine two".to_string()),
        };
        let contact = validate_contact(form).unwrap();
        assert_eq!(contact.company, None);
        assert_eq!(contact.display_name(), "Jo");
    }
}
