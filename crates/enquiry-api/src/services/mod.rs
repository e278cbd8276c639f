pub mod email;
pub mod submission;
