//! Background merge execution.
//!
//! [`MergeTask`] runs a whole merge on a blocking worker thread so the
//! caller's event loop stays responsive. Progress arrives in order over an
//! unbounded channel that closes when the worker finishes; the terminal
//! result is obtained with [`MergeTask::wait`].

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{DocCatError, Result};
use crate::merge::{MergeProgress, MergeReport, Merger};
use crate::session::InputItem;

/// Requests cancellation of a running merge.
///
/// Cancellation is cooperative: the worker stops before starting the next
/// input, so the input in flight is always finished first.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Ask the merge to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A merge running on a background worker.
#[derive(Debug)]
pub struct MergeTask {
    progress: mpsc::UnboundedReceiver<MergeProgress>,
    handle: JoinHandle<Result<MergeReport>>,
    cancel: CancelHandle,
}

impl MergeTask {
    /// Start merging `inputs` into `destination`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(merger: Merger, inputs: Vec<InputItem>, destination: PathBuf) -> Self {
        Self::spawn_with_cancel(merger, inputs, destination, CancelHandle::default())
    }

    /// Like [`MergeTask::spawn`], observing an existing cancel handle.
    pub fn spawn_with_cancel(
        merger: Merger,
        inputs: Vec<InputItem>,
        destination: PathBuf,
        cancel: CancelHandle,
    ) -> Self {
        let (sender, progress) = mpsc::unbounded_channel();
        let flag = Arc::clone(&cancel.0);

        let handle = tokio::task::spawn_blocking(move || {
            merger.merge_to_file(&inputs, &destination, &flag, |update| {
                // The receiver may have been dropped; the merge carries on.
                let _ = sender.send(update);
            })
        });

        Self {
            progress,
            handle,
            cancel,
        }
    }

    /// Next progress update, or `None` once the worker has finished.
    pub async fn next_progress(&mut self) -> Option<MergeProgress> {
        self.progress.recv().await
    }

    /// Handle that can cancel this merge from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the merge to finish and return its result.
    ///
    /// Undelivered progress updates are discarded.
    pub async fn wait(self) -> Result<MergeReport> {
        self.handle
            .await
            .map_err(|e| DocCatError::other(format!("Merge worker failed: {e}")))?
    }
}
