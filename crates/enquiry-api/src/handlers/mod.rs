pub mod contact;
pub mod quote;
