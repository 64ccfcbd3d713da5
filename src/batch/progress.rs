//! Progress reporting for batch runs
//!
//! Defines the `ProgressReporter` trait for per-URL lifecycle events and
//! provides a silent and a logging implementation.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

use crate::result_store::RecordStatus;

/// Trait for reporting batch progress at key lifecycle events
///
/// Calls arrive from many pipelines at once, in no particular order.
pub trait ProgressReporter: Send + Sync {
    /// The batch is about to start `total` pipelines
    fn report_batch_started(&self, _total: usize) {}

    /// A pipeline for `url` has started
    fn report_started(&self, url: &str);

    /// The pipeline for `url` has settled
    fn report_finished(&self, url: &str, status: RecordStatus, candidates: usize);

    /// Every pipeline has settled
    fn report_batch_completed(&self, succeeded: usize, failed: usize);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_batch_started(&self, _total: usize) {}

    #[inline(always)]
    fn report_started(&self, _url: &str) {}

    #[inline(always)]
    fn report_finished(&self, _url: &str, _status: RecordStatus, _candidates: usize) {}

    #[inline(always)]
    fn report_batch_completed(&self, _succeeded: usize, _failed: usize) {}
}

/// Logs a `[done/total]` line per settled URL
///
/// `total` is the number of unique URLs in the batch, known before any
/// pipeline waits for a concurrency permit.
#[derive(Debug, Default)]
pub struct LogProgress {
    total: AtomicUsize,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl LogProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for LogProgress {
    fn report_batch_started(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.started.store(0, Ordering::Relaxed);
        self.finished.store(0, Ordering::Relaxed);
    }

    fn report_started(&self, url: &str) {
        let started = self.started.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(url, started, "Pipeline started");
    }

    fn report_finished(&self, url: &str, status: RecordStatus, candidates: usize) {
        let done = self.finished.fetch_add(1, Ordering::Relaxed) + 1;
        let total = self.total();
        info!("[{done}/{total}] {status}: {url} ({candidates} candidate images)");
    }

    fn report_batch_completed(&self, succeeded: usize, failed: usize) {
        info!("Batch completed: {succeeded} succeeded, {failed} failed");
    }
}
