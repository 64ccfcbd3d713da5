//! Chromium-backed sessions
//!
//! Every session is a separate Chrome process with its own throwaway
//! profile directory, so cookies, local storage and cache never carry over
//! from one product page to the next.

use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::page_timeout::FetchError;
use super::session::{BrowserLauncher, BrowserSession, RenderedPage};
use crate::browser_setup::{launch_browser, resolve_browser_executable};
use crate::config::HarvestConfig;

/// Launches one Chrome process per session
///
/// The executable is resolved once per launcher (and its clones), so
/// concurrent sessions never repeat discovery or race a download.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    headless: bool,
    data_root: PathBuf,
    executable: Arc<OnceCell<PathBuf>>,
}

impl ChromiumLauncher {
    /// `data_root` receives one profile directory per session (temp dir if `None`)
    #[must_use]
    pub fn new(headless: bool, data_root: Option<PathBuf>) -> Self {
        Self {
            headless,
            data_root: data_root.unwrap_or_else(std::env::temp_dir),
            executable: Arc::new(OnceCell::new()),
        }
    }

    /// Use `path` instead of discovering an executable
    #[must_use]
    pub fn with_executable(self, path: PathBuf) -> Self {
        Self {
            executable: Arc::new(OnceCell::new_with(Some(path))),
            ..self
        }
    }

    /// The browser executable, resolved on first use
    pub async fn executable(&self) -> Result<&PathBuf, FetchError> {
        self.executable
            .get_or_try_init(resolve_browser_executable)
            .await
            .map_err(FetchError::browser)
    }

    #[must_use]
    pub fn from_config(config: &HarvestConfig) -> Self {
        let launcher = Self::new(config.headless(), config.chrome_data_dir().cloned());
        match config.browser_executable() {
            Some(path) => launcher.with_executable(path.clone()),
            None => launcher,
        }
    }

    fn next_profile_dir(&self) -> PathBuf {
        self.data_root
            .join(format!("kodegen_imagescrape_{}", Uuid::new_v4().simple()))
    }
}

impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn prepare(&self) -> Result<(), FetchError> {
        let path = self.executable().await?;
        info!("Using browser executable {}", path.display());
        Ok(())
    }

    async fn start(&self) -> Result<ChromiumSession, FetchError> {
        let chrome_path = self.executable().await?;
        let profile_dir = self.next_profile_dir();
        let (browser, handler, user_data_dir) =
            launch_browser(chrome_path, self.headless, Some(profile_dir))
                .await
                .map_err(FetchError::browser)?;

        Ok(ChromiumSession::new(browser, handler, user_data_dir))
    }
}

/// Wrapper for Browser and its event handler task
///
/// `stop()` is the normal release path. If the session is dropped without
/// it (a panicking pipeline), `Drop` still aborts the handler and removes
/// the profile directory; chromiumoxide kills the child process when the
/// `Browser` itself drops.
pub struct ChromiumSession {
    browser: Option<Browser>,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl ChromiumSession {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser: Some(browser),
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    /// Clean up the profile directory (blocking operation)
    ///
    /// MUST run after `browser.wait()` so Chrome has released its file
    /// handles. Blocking `remove_dir_all` because this may run from `Drop`.
    fn cleanup_profile_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Removing session profile directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to remove profile directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl BrowserSession for ChromiumSession {
    type Page = Page;

    async fn get(&self, url: &str) -> Result<Page, FetchError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| FetchError::Browser("session already stopped".to_string()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(FetchError::browser)?;

        page.goto(url).await.map_err(FetchError::browser)?;
        Ok(page)
    }

    async fn stop(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {e}");
            }
            // Wait for the process to exit so the profile directory is unlocked
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
        }

        self.handler.abort();
        self.cleanup_profile_dir();
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();

        if self.user_data_dir.is_some() {
            info!("ChromiumSession dropped without stop() - cleaning up in Drop");
            self.cleanup_profile_dir();
        }
    }
}

impl RenderedPage for Page {
    async fn content(&self) -> Result<String, FetchError> {
        Page::content(self).await.map_err(FetchError::browser)
    }
}
