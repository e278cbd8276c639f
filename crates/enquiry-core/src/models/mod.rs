pub mod alert;
pub mod notification;
pub mod submission;

pub use alert::{AlertKind, AlertOutcome};
pub use notification::{AttachmentRef, NotificationPayload};
pub use submission::{ContactForm, ContactSubmission, FieldMap, QuoteSubmission, StagedFile};
