//! Per-request staging of uploaded files.
//!
//! A [`StagingArea`] owns every file written during one submission. Each file part gets
//! its own sink task; [`StagingArea::settle`] is the barrier that waits for all of them
//! to report a durable write. Cleanup deletes every path the area ever allocated, whether
//! or not its write finished.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use enquiry_core::{AppError, StagedFile};
use enquiry_storage::{part_channel, PartWriter, ScratchStorage, StorageResult};

/// How long to wait for abandoned sinks to notice their producer is gone.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Result of deleting a staging area's files
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub already_absent: usize,
    pub failed: usize,
}

pub struct StagingArea {
    storage: Arc<dyn ScratchStorage>,
    files: Vec<StagedFile>,
    sinks: JoinSet<(usize, StorageResult<u64>)>,
    drain_grace: Duration,
    cleaned: bool,
}

impl StagingArea {
    pub fn new(storage: Arc<dyn ScratchStorage>) -> Self {
        Self {
            storage,
            files: Vec::new(),
            sinks: JoinSet::new(),
            drain_grace: DEFAULT_DRAIN_GRACE,
            cleaned: false,
        }
    }

    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }

    /// Allocate a destination for a file part and start its sink.
    ///
    /// The path is recorded before the sink starts, so cleanup covers it even if the
    /// write never completes.
    pub fn dispatch(
        &mut self,
        field_name: &str,
        original_name: &str,
        content_type: Option<String>,
    ) -> PartWriter {
        let path = self.storage.allocate(original_name);
        let index = self.files.len();
        self.files.push(StagedFile {
            original_name: original_name.to_string(),
            content_type,
            path: path.clone(),
            field_name: field_name.to_string(),
            size_bytes: 0,
        });

        let (writer, chunks) = part_channel();
        let storage = self.storage.clone();
        self.sinks.spawn(async move {
            let result = storage.write_stream(&path, chunks).await;
            (index, result)
        });

        tracing::debug!(
            field = %field_name,
            file = %original_name,
            index,
            "File part dispatched to staging"
        );
        writer
    }

    /// Number of file parts dispatched so far.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Wait for every dispatched sink and return the staged files in arrival order.
    ///
    /// Fails if any sink failed; the files stay registered for cleanup either way.
    pub async fn settle(&mut self) -> Result<Vec<StagedFile>, AppError> {
        let mut first_error: Option<AppError> = None;

        while let Some(joined) = self.sinks.join_next().await {
            match joined {
                Ok((index, Ok(size))) => self.files[index].size_bytes = size,
                Ok((index, Err(e))) => {
                    let name = &self.files[index].original_name;
                    tracing::warn!(file = %name, error = %e, "Staging write failed");
                    first_error
                        .get_or_insert_with(|| AppError::parse(format!("could not store {}", name)));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Staging task failed");
                    first_error
                        .get_or_insert_with(|| AppError::Internal(format!("staging task: {}", e)));
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(self.files.clone()),
        }
    }

    /// Wait for sinks after their producer was abandoned.
    ///
    /// Dropped writers end their streams, so sinks normally finish on their own. Any
    /// sink still running after the grace period is aborted.
    pub async fn drain(&mut self) {
        if self.sinks.is_empty() {
            return;
        }

        let finished = tokio::time::timeout(self.drain_grace, async {
            while self.sinks.join_next().await.is_some() {}
        })
        .await;

        if finished.is_err() {
            tracing::warn!(
                pending = self.sinks.len(),
                "Staging sinks did not finish in time, aborting"
            );
            self.sinks.abort_all();
            while self.sinks.join_next().await.is_some() {}
        }
    }

    /// Drain outstanding sinks, then delete every allocated path. Safe to call twice.
    pub async fn cleanup(&mut self) -> CleanupReport {
        self.drain().await;

        let mut report = CleanupReport::default();
        for file in &self.files {
            match self.storage.remove_if_exists(&file.path).await {
                Ok(true) => report.removed += 1,
                Ok(false) => report.already_absent += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(path = %file.path.display(), error = %e, "Failed to remove staged file");
                }
            }
        }
        self.cleaned = true;
        report
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if self.cleaned || self.files.is_empty() {
            return;
        }

        // Reached when the request future is dropped mid-flight (client disconnect).
        let paths: Vec<PathBuf> = self.files.iter().map(|f| f.path.clone()).collect();
        let mut sinks = std::mem::take(&mut self.sinks);
        let storage = self.storage.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    while sinks.join_next().await.is_some() {}
                    for path in paths {
                        if let Err(e) = storage.remove_if_exists(&path).await {
                            tracing::error!(path = %path.display(), error = %e, "Failed to remove staged file");
                        }
                    }
                });
            }
            Err(_) => {
                sinks.abort_all();
                for path in paths {
                    let _ = std::fs::remove_file(path);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use enquiry_storage::LocalScratch;

    async fn scratch() -> (tempfile::TempDir, Arc<dyn ScratchStorage>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalScratch::new(dir.path()).await.unwrap();
        (dir, Arc::new(storage))
    }

    fn residual(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn settle_waits_for_every_write() {
        let (dir, storage) = scratch().await;
        let mut staging = StagingArea::new(storage);

        let first = staging.dispatch("files", "a.txt", Some("text/plain".to_string()));
        let second = staging.dispatch("files", "b.txt", None);
        second.send(Bytes::from_static(b"second"));
        first.send(Bytes::from_static(b"first!!"));
        second.finish();
        first.finish();

        let files = staging.settle().await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].original_name, "a.txt");
        assert_eq!(files[0].size_bytes, 7);
        assert_eq!(files[1].size_bytes, 6);
        assert_eq!(std::fs::read(&files[1].path).unwrap(), b"second");

        let report = staging.cleanup().await;
        assert_eq!(report.removed, 2);
        assert_eq!(residual(&dir), 0);
    }

    #[tokio::test]
    async fn abandoned_part_fails_settle_but_is_cleaned() {
        let (dir, storage) = scratch().await;
        let mut staging = StagingArea::new(storage);

        let writer = staging.dispatch("files", "cut.bin", None);
        writer.send(Bytes::from_static(b"half"));
        drop(writer);

        assert!(matches!(staging.settle().await, Err(AppError::Parse(_))));

        staging.cleanup().await;
        assert_eq!(residual(&dir), 0);
    }

    #[tokio::test]
    async fn cleanup_twice_is_harmless() {
        let (dir, storage) = scratch().await;
        let mut staging = StagingArea::new(storage);
        staging.dispatch("files", "x.txt", None).finish();
        staging.settle().await.unwrap();

        let first = staging.cleanup().await;
        let second = staging.cleanup().await;
        assert_eq!(first.removed, 1);
        assert_eq!(second.removed, 0);
        assert_eq!(second.already_absent, 1);
        assert_eq!(second.failed, 0);
        assert_eq!(residual(&dir), 0);
    }
}
