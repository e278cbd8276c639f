//! Per-part byte channel between the multipart parser and a staging writer.

use crate::traits::ChunkStream;
use bytes::Bytes;
use std::io;
use tokio::sync::mpsc;

/// Producer half of a part channel.
///
/// Dropping a writer without calling [`finish`](Self::finish) terminates the stream with
/// an `Interrupted` error, so the consumer never mistakes a cut-off part for a whole one.
#[derive(Debug)]
pub struct PartWriter {
    tx: Option<mpsc::UnboundedSender<io::Result<Bytes>>>,
}

impl PartWriter {
    /// Forward a chunk. Returns `false` once the consumer has gone away.
    pub fn send(&self, chunk: Bytes) -> bool {
        match &self.tx {
            Some(tx) => tx.send(Ok(chunk)).is_ok(),
            None => false,
        }
    }

    /// Mark the part complete and close the stream cleanly.
    pub fn finish(mut self) {
        self.tx.take();
    }
}

impl Drop for PartWriter {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "part ended before completion",
            )));
        }
    }
}

/// Open a channel for one file part.
pub fn part_channel() -> (PartWriter, ChunkStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });
    (PartWriter { tx: Some(tx) }, Box::pin(stream))
}
