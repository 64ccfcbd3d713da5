//! Rendered-page acquisition with bounded polling
//!
//! `PageFetcher::fetch` drives one URL through the [`FetchState`] machine:
//! start a fresh session, navigate, then poll the rendered markup until an
//! image tag shows up or the attempt budget runs out. Every step is timed,
//! every failure becomes a [`FetchOutcome::Failure`], and the session is
//! stopped exactly once on every path out of the loop.

pub mod chromium;
pub mod page_timeout;
pub mod session;
pub mod state;

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::HarvestConfig;
use crate::result_store::{RecordStatus, ResultStore};
use crate::utils::IMAGE_TAG_MARKER;

pub use chromium::{ChromiumLauncher, ChromiumSession};
pub use page_timeout::{FetchError, with_page_timeout};
pub use session::{BrowserLauncher, BrowserSession, RenderedPage};
pub use state::{FailureReason, FetchOutcome, FetchState};

/// Fetches fully rendered product pages, one isolated session per call
#[derive(Debug, Clone)]
pub struct PageFetcher<L> {
    launcher: L,
    launch_timeout: Duration,
    navigation_timeout: Duration,
    content_timeout: Duration,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl<L: BrowserLauncher> PageFetcher<L> {
    /// Build a fetcher using the timing policy from `config`
    pub fn new(launcher: L, config: &HarvestConfig) -> Self {
        Self {
            launcher,
            launch_timeout: config.launch_timeout(),
            navigation_timeout: config.navigation_timeout(),
            content_timeout: config.content_timeout(),
            poll_interval: config.poll_interval(),
            max_poll_attempts: config.max_poll_attempts(),
        }
    }

    /// Run the launcher's one-time setup outside any session timeout
    pub async fn prepare(&self) -> Result<(), FetchError> {
        self.launcher.prepare().await
    }

    /// Fetch the rendered markup of `url`
    ///
    /// Never returns an error: failures are reported as
    /// `FetchOutcome::Failure` and recorded as `Failed` in `store` before
    /// this returns. Success is left for the caller to record once
    /// extraction has run.
    pub async fn fetch(&self, url: &str, store: &ResultStore) -> FetchOutcome {
        let mut session: Option<L::Session> = None;
        let mut page: Option<<L::Session as BrowserSession>::Page> = None;
        let mut state = FetchState::Starting;

        while !state.is_terminal() {
            state = match state {
                FetchState::Starting => {
                    let launch = self.launcher.start();
                    match with_page_timeout(launch, self.launch_timeout, "Browser launch").await {
                        Ok(started) => {
                            session = Some(started);
                            FetchState::Navigating
                        }
                        Err(e) => {
                            warn!(url, "Failed to start browser session: {e}");
                            FetchState::on_error(&e)
                        }
                    }
                }

                FetchState::Navigating => {
                    // Navigating is only entered after a successful start
                    let navigation = match session.as_ref() {
                        Some(active) => {
                            with_page_timeout(
                                active.get(url),
                                self.navigation_timeout,
                                "Page navigation",
                            )
                            .await
                        }
                        None => Err(FetchError::Browser("no active session".to_string())),
                    };
                    match navigation {
                        Ok(loaded) => {
                            debug!(url, "Navigation finished, polling for image content");
                            page = Some(loaded);
                            FetchState::Polling { attempt: 1 }
                        }
                        Err(e) => {
                            warn!(url, "Navigation failed: {e}");
                            FetchState::on_error(&e)
                        }
                    }
                }

                FetchState::Polling { attempt } => {
                    tokio::time::sleep(self.poll_interval).await;

                    let content = match page.as_ref() {
                        Some(loaded) => {
                            with_page_timeout(
                                loaded.content(),
                                self.content_timeout,
                                "Content fetch",
                            )
                            .await
                        }
                        None => Err(FetchError::Browser("no loaded page".to_string())),
                    };
                    match content {
                        Ok(markup) => {
                            let next = FetchState::after_poll(
                                attempt,
                                self.max_poll_attempts,
                                markup,
                                IMAGE_TAG_MARKER,
                            );
                            if matches!(next, FetchState::Polling { .. }) {
                                debug!(
                                    url,
                                    attempt,
                                    max = self.max_poll_attempts,
                                    "No image tag yet, polling again"
                                );
                            }
                            next
                        }
                        Err(e) => {
                            warn!(url, attempt, "Content fetch failed, giving up on page: {e}");
                            FetchState::on_error(&e)
                        }
                    }
                }

                terminal @ (FetchState::Succeeded(_) | FetchState::Failed(_)) => terminal,
            };
        }

        // Page handles belong to the session; drop before releasing it
        drop(page);
        if let Some(active) = session {
            active.stop().await;
        }

        let outcome = match state {
            FetchState::Succeeded(markup) => FetchOutcome::Success { markup },
            FetchState::Failed(reason) => FetchOutcome::Failure { reason },
            // The loop only exits on a terminal state
            other => {
                warn!(url, state = other.label(), "Fetch loop ended in a non-terminal state");
                FetchOutcome::Failure {
                    reason: FailureReason::BrowserError,
                }
            }
        };

        match &outcome {
            FetchOutcome::Success { markup } => {
                info!(url, bytes = markup.len(), "Fetched rendered page");
            }
            FetchOutcome::Failure { reason } => {
                info!(url, %reason, "Fetch failed");
                store.set_status(url, RecordStatus::Failed).await;
            }
        }

        outcome
    }
}
