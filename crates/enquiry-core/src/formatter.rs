//! Notification formatting
//!
//! Pure functions from validated submissions to [`NotificationPayload`]s. Nothing here
//! reads the clock or the environment: the submission time and display zone are
//! passed in, so output is stable for fixed inputs.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::{
    AttachmentRef, ContactSubmission, NotificationPayload, QuoteSubmission, StagedFile,
};

const CONTACT_MISSING: &str = "Not provided";
const QUOTE_MISSING: &str = "N/A";

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Day-first local presentation, e.g. `19/10/2026, 3:04:05 pm`.
pub fn format_submitted_at(submitted_at: DateTime<Utc>, timezone: Tz) -> String {
    submitted_at
        .with_timezone(&timezone)
        .format("%d/%m/%Y, %-I:%M:%S %P")
        .to_string()
}

fn line(label: &str, value: &str) -> String {
    format!("<p><strong>{}:</strong> {}</p>\n", label, escape_html(value))
}

fn optional_line(label: &str, value: Option<&str>, fallback: &str) -> String {
    line(label, value.unwrap_or(fallback))
}

fn attachment_listing(attachments: &[AttachmentRef]) -> String {
    if attachments.is_empty() {
        return String::new();
    }
    let items: String = attachments
        .iter()
        .map(|a| format!("<li>{}</li>", escape_html(&a.filename)))
        .collect();
    format!(
        "<p><strong>Attached Files:</strong> {}</p>\n<ul>{}</ul>\n",
        attachments.len(),
        items
    )
}

/// HTML body for a contact message.
pub fn render_contact_html(contact: &ContactSubmission, submitted: &str) -> String {
    let message = escape_html(&contact.message).replace('\n', "<br>");
    let mut body = String::from(
        "<div style=\"font-family: Arial; max-width: 600px;\">\n\
         <h2 style=\"color: #0A0E27; border-bottom: 3px solid #00D4FF;\">New Contact</h2>\n\
         <div style=\"background: #f8f9fa; padding: 20px; margin: 20px 0;\">\n",
    );
    body.push_str(&line("Name", &contact.name));
    body.push_str(&optional_line(
        "Company",
        contact.company.as_deref(),
        CONTACT_MISSING,
    ));
    body.push_str(&line("Email", &contact.email));
    body.push_str(&optional_line(
        "Phone",
        contact.phone.as_deref(),
        CONTACT_MISSING,
    ));
    body.push_str(&line("Subject", &contact.subject));
    body.push_str(&format!("<p><strong>Message:</strong><br>{}</p>\n", message));
    body.push_str("</div>\n");
    body.push_str(&format!("<p>Submitted: {}</p>\n</div>\n", submitted));
    body
}

/// HTML body for a quote request.
pub fn render_quote_html(
    quote: &QuoteSubmission,
    attachments: &[AttachmentRef],
    submitted: &str,
) -> String {
    let mut body = String::from(
        "<div style=\"font-family: Arial; max-width: 600px;\">\n\
         <h2>Quote Request</h2>\n\
         <div style=\"background: #f8f9fa; padding: 20px; margin: 20px 0;\">\n\
         <h3>Company Information</h3>\n",
    );
    body.push_str(&line("Company", &quote.company));
    body.push_str(&line("Contact", &quote.contact_person));
    body.push_str(&line("Email", &quote.email));
    body.push_str(&optional_line("Phone", quote.phone.as_deref(), QUOTE_MISSING));
    body.push_str(
        "</div>\n\
         <div style=\"background: #f8f9fa; padding: 20px; margin: 20px 0;\">\n\
         <h3>Project Details</h3>\n",
    );
    body.push_str(&line("Component", &quote.component_type));
    body.push_str(&optional_line(
        "Quantity",
        quote.quantity.as_deref(),
        QUOTE_MISSING,
    ));
    body.push_str(&optional_line(
        "Material",
        quote.material.as_deref(),
        QUOTE_MISSING,
    ));
    body.push_str(&optional_line(
        "Timeline",
        quote.timeline.as_deref(),
        QUOTE_MISSING,
    ));
    body.push_str(&line("Description", &quote.description));
    body.push_str("</div>\n");
    body.push_str(&attachment_listing(attachments));
    body.push_str(&format!("<p>Submitted: {}</p>\n</div>\n", submitted));
    body
}

/// Build the mail for a validated contact message. Replies go to the submitter.
pub fn contact_notification(
    contact: &ContactSubmission,
    recipients: &[String],
    submitted_at: DateTime<Utc>,
    timezone: Tz,
) -> NotificationPayload {
    let submitted = format_submitted_at(submitted_at, timezone);
    NotificationPayload {
        recipients: recipients.to_vec(),
        subject: format!("Contact: {} - {}", contact.subject, contact.name),
        html_body: render_contact_html(contact, &submitted),
        reply_to: Some(contact.email.clone()),
        attachments: Vec::new(),
    }
}

/// Build the mail for a validated quote request, attaching every staged file.
pub fn quote_notification(
    quote: &QuoteSubmission,
    files: &[StagedFile],
    recipients: &[String],
    submitted_at: DateTime<Utc>,
    timezone: Tz,
) -> NotificationPayload {
    let submitted = format_submitted_at(submitted_at, timezone);
    let attachments: Vec<AttachmentRef> = files.iter().map(AttachmentRef::from).collect();
    NotificationPayload {
        recipients: recipients.to_vec(),
        subject: format!("Quote: {} - {}", quote.company, quote.component_type),
        html_body: render_quote_html(quote, &attachments, &submitted),
        reply_to: Some(quote.email.clone()),
        attachments,
    }
}
