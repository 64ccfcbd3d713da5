//! Batch orchestration over the input URL list
//!
//! One pipeline (fetch, extract, record) is spawned per unique URL. A
//! semaphore bounds how many run at once; every pipeline writes its own
//! outcome into the shared `ResultStore`, and a pipeline that panics is
//! recorded as `Failed` by the orchestrator. Nothing a pipeline does can
//! abort the batch.

pub mod progress;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::HarvestConfig;
use crate::image_extractor;
use crate::page_fetcher::{BrowserLauncher, FetchOutcome, PageFetcher};
use crate::result_store::{RecordStatus, ResultRecord, ResultStore};

pub use progress::{LogProgress, NoOpProgress, ProgressReporter};

/// Drives every input URL through its pipeline and collects the outcomes
pub struct BatchOrchestrator<L, P = NoOpProgress> {
    fetcher: Arc<PageFetcher<L>>,
    progress: Arc<P>,
    max_concurrent: Option<usize>,
}

impl<L> BatchOrchestrator<L, NoOpProgress>
where
    L: BrowserLauncher + 'static,
{
    pub fn new(fetcher: PageFetcher<L>, max_concurrent: Option<usize>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            progress: Arc::new(NoOpProgress),
            max_concurrent,
        }
    }

    /// Orchestrator with the fetch policy and concurrency bound from `config`
    pub fn from_config(launcher: L, config: &HarvestConfig) -> Self {
        Self::new(
            PageFetcher::new(launcher, config),
            config.max_concurrent_pages(),
        )
    }
}

impl<L, P> BatchOrchestrator<L, P>
where
    L: BrowserLauncher + 'static,
    P: ProgressReporter + 'static,
{
    /// Replace the progress reporter
    pub fn with_progress<Q: ProgressReporter + 'static>(
        self,
        progress: Q,
    ) -> BatchOrchestrator<L, Q> {
        BatchOrchestrator {
            fetcher: self.fetcher,
            progress: Arc::new(progress),
            max_concurrent: self.max_concurrent,
        }
    }

    /// Run every URL to completion and return the outcome of each
    ///
    /// Duplicate URLs are processed once (first occurrence wins). The
    /// returned map holds exactly one record per unique input URL.
    pub async fn run(&self, urls: &[String]) -> HashMap<String, ResultRecord> {
        let store = Arc::new(ResultStore::new());
        let unique = dedup_urls(urls);
        let semaphore = self.max_concurrent.map(|limit| Arc::new(Semaphore::new(limit)));

        info!(
            "Starting batch of {} URLs (concurrency: {})",
            unique.len(),
            self.max_concurrent
                .map_or_else(|| "unbounded".to_string(), |limit| limit.to_string())
        );

        if let Err(e) = self.fetcher.prepare().await {
            warn!("Browser preparation failed, sessions will retry on start: {e}");
        }

        self.progress.report_batch_started(unique.len());
        let mut active_tasks = FuturesUnordered::new();

        for url in unique {
            let permit = match &semaphore {
                Some(semaphore) => match Arc::clone(semaphore).acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(e) => {
                        error!("Semaphore closed unexpectedly: {e}");
                        store.ensure_recorded(&url).await;
                        continue;
                    }
                },
                None => None,
            };

            let fetcher = Arc::clone(&self.fetcher);
            let store_for_task = Arc::clone(&store);
            let progress = Arc::clone(&self.progress);
            let task_url = url.clone();

            progress.report_started(&url);
            let task = tokio::spawn(async move {
                let _permit = permit; // Hold until the pipeline settles
                run_pipeline(&fetcher, &store_for_task, &task_url).await
            });

            active_tasks.push(async move { (url, task.await) });
        }

        let mut succeeded = 0usize;
        let mut failed = 0usize;

        while let Some((url, joined)) = active_tasks.next().await {
            let (status, candidates) = match joined {
                Ok(settled) => settled,
                Err(e) => {
                    error!(url, "Pipeline task panicked: {e}");
                    store.ensure_recorded(&url).await;
                    (RecordStatus::Failed, 0)
                }
            };

            match status {
                RecordStatus::Success => succeeded += 1,
                RecordStatus::Failed => failed += 1,
            }
            self.progress.report_finished(&url, status, candidates);
        }

        self.progress.report_batch_completed(succeeded, failed);
        store.snapshot().await
    }
}

/// Fetch, extract and record one URL; returns its status and candidate count
async fn run_pipeline<L: BrowserLauncher>(
    fetcher: &PageFetcher<L>,
    store: &ResultStore,
    url: &str,
) -> (RecordStatus, usize) {
    match fetcher.fetch(url, store).await {
        FetchOutcome::Success { markup } => {
            let candidates = image_extractor::extract(&markup, url);
            let count = candidates.len();
            debug!(url, count, "Recording extracted candidates");

            store.set_status(url, RecordStatus::Success).await;
            store.append_candidates(url, candidates).await;
            (RecordStatus::Success, count)
        }
        // The fetcher has already recorded the failure
        FetchOutcome::Failure { .. } => (RecordStatus::Failed, 0),
    }
}

/// Drop repeated URLs, keeping the first occurrence and input order
fn dedup_urls(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    let mut unique = Vec::with_capacity(urls.len());

    for url in urls {
        if seen.insert(url.as_str()) {
            unique.push(url.clone());
        } else {
            warn!("Skipping duplicate input URL: {url}");
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let urls: Vec<String> = [
            "https://a.example/1",
            "https://b.example/2",
            "https://a.example/1",
            "https://c.example/3",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        assert_eq!(
            dedup_urls(&urls),
            vec!["https://a.example/1", "https://b.example/2", "https://c.example/3"]
        );
    }
}
