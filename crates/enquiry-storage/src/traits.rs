//! Scratch storage abstraction
//!
//! This module defines the trait the submission pipeline uses to stage uploads:
//! reserve a destination, stream bytes into it, delete it afterwards.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;

/// Scratch storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    /// The producer stopped before the part was complete.
    #[error("Part truncated: {0}")]
    Truncated(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte chunks of one uploaded file. An `Err` item means the producer gave up and the
/// part must not be treated as complete.
pub type ChunkStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Temporary filesystem used to stage uploads for the duration of one request.
#[async_trait]
pub trait ScratchStorage: Send + Sync {
    /// Reserve a collision-resistant destination for a file with the given original name.
    ///
    /// Nothing is created on disk until [`write_stream`](Self::write_stream) runs.
    fn allocate(&self, original_name: &str) -> PathBuf;

    /// Write every chunk to `path` and return the byte count.
    ///
    /// Returns only after the data has been flushed to the filesystem, never when it is
    /// merely buffered. A stream ending in an `Err` item yields [`StorageError::Truncated`].
    async fn write_stream(&self, path: &Path, chunks: ChunkStream) -> StorageResult<u64>;

    /// Delete `path` if present. Returns `Ok(false)` when it was already absent.
    async fn remove_if_exists(&self, path: &Path) -> StorageResult<bool>;
}
