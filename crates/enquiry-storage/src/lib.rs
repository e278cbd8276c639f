//! Enquiry Storage Library
//!
//! Scratch storage for uploaded files that only live for one submission.
//!
//! # Staged file names
//!
//! Every upload gets a fresh name inside the scratch directory:
//! `{unix_millis}-{random}-{sanitized original name}`. The original name is reduced to
//! its final path component and unsafe characters are replaced, so a staged path can
//! never escape the scratch directory. Name generation lives in the `keys` module.

pub(crate) mod keys;
pub mod local;
pub mod sink;
pub mod traits;

// Re-export commonly used types
pub use keys::sanitize_filename;
pub use local::LocalScratch;
pub use sink::{part_channel, PartWriter};
pub use traits::{ChunkStream, ScratchStorage, StorageError, StorageResult};
