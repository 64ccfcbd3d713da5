//! Locating, downloading and launching Chrome/Chromium

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::utils::constants::CHROME_USER_AGENT;

/// Environment variable that overrides executable discovery
pub const BROWSER_PATH_ENV: &str = "CHROMIUM_PATH";

/// Flags passed to every launched browser
///
/// Product pages are only read, never interacted with, so background
/// services and first-run UI are switched off.
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-extensions",
    "--disable-popup-blocking",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-hang-monitor",
    "--disable-prompt-on-repost",
    "--disable-setuid-sandbox",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--password-store=basic",
    "--use-mock-keychain",
    "--hide-scrollbars",
    "--mute-audio",
];

fn platform_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &[
            r"%PROGRAMFILES%\Google\Chrome\Application\chrome.exe",
            r"%PROGRAMFILES(X86)%\Google\Chrome\Application\chrome.exe",
            r"%LOCALAPPDATA%\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "~/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
        ]
    }
}

/// Expand `~/` and `%VAR%` in a candidate path; `None` if home is unknown
fn expand_candidate(raw: &str) -> Option<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/") {
        return dirs::home_dir().map(|home| home.join(rest));
    }
    if raw.contains('%') {
        return Some(PathBuf::from(expand_windows_env_vars(raw)));
    }
    Some(PathBuf::from(raw))
}

/// Substitute `%VAR%` tokens from the environment
///
/// Unknown variables and an unterminated `%` are kept verbatim; `%%`
/// collapses to a single `%`.
fn expand_windows_env_vars(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('%') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match (name.is_empty(), std::env::var(name)) {
            (true, _) => out.push('%'),
            (false, Ok(value)) => out.push_str(&value),
            (false, Err(_)) => {
                out.push('%');
                out.push_str(name);
                out.push('%');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

async fn which_browser() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return None;
    }

    for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
        let Ok(output) = Command::new("which").arg(cmd).output().await else {
            continue;
        };
        if !output.status.success() {
            continue;
        }
        let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !found.is_empty() {
            return Some(PathBuf::from(found));
        }
    }
    None
}

/// Find a Chrome/Chromium executable: `CHROMIUM_PATH`, then well-known
/// install locations, then `which`.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(BROWSER_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from {BROWSER_PATH_ENV}: {}", path.display());
            return Ok(path);
        }
        warn!(
            "{BROWSER_PATH_ENV} points to non-existent file: {}",
            path.display()
        );
    }

    if let Some(path) = platform_candidates()
        .iter()
        .filter_map(|raw| expand_candidate(raw))
        .find(|path| path.exists())
    {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if let Some(path) = which_browser().await {
        info!("Found browser using 'which': {}", path.display());
        return Ok(path);
    }

    warn!("No Chrome/Chromium executable found. Will download a managed browser.");
    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download Chromium into the user cache directory and return its executable
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir();
            warn!(
                "Could not determine user cache directory, using {}",
                fallback.display()
            );
            fallback
        })
        .join("kodegen_imagescrape")
        .join("chromium");

    info!("Downloading managed Chromium into {}", cache_dir.display());
    tokio::fs::create_dir_all(&cache_dir)
        .await
        .context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );

    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;
    info!("Downloaded Chromium to: {}", revision.folder_path.display());

    Ok(revision.executable_path)
}

/// Find an installed browser, downloading a managed one as a last resort
pub async fn resolve_browser_executable() -> Result<PathBuf> {
    match find_browser_executable().await {
        Ok(path) => Ok(path),
        Err(_) => download_managed_browser().await,
    }
}

/// Launch the browser at `chrome_path` with its own profile directory
///
/// Returns the browser, the task draining its CDP event stream, and the
/// profile directory actually used. Without `user_data_dir` a per-process
/// directory under the system temp dir is used.
pub async fn launch_browser(
    chrome_path: &Path,
    headless: bool,
    user_data_dir: Option<PathBuf>,
) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let user_data_dir = user_data_dir.unwrap_or_else(|| {
        std::env::temp_dir().join(format!("kodegen_imagescrape_{}", std::process::id()))
    });
    tokio::fs::create_dir_all(&user_data_dir)
        .await
        .context("Failed to create user data directory")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path)
        .arg(format!("--user-agent={CHROME_USER_AGENT}"));

    builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    for arg in LAUNCH_ARGS {
        builder = builder.arg(*arg);
    }

    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    debug!("Launching browser (headless: {headless}) with profile {}", user_data_dir.display());
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // chromiumoxide cannot decode some newer CDP events; those are noise
                if message.contains("data did not match any variant of untagged enum Message")
                    || message.contains("Failed to deserialize WS response")
                {
                    trace!("Suppressed benign CDP serialization error: {message}");
                } else {
                    error!("Browser handler error: {e:?}");
                }
            }
        }
        debug!("Browser handler task completed");
    });

    Ok((browser, handler_task, user_data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_malformed_tokens_are_preserved() {
        assert_eq!(
            expand_windows_env_vars(r"%KODEGEN_SURELY_UNSET_VAR%\chrome.exe"),
            r"%KODEGEN_SURELY_UNSET_VAR%\chrome.exe"
        );
        assert_eq!(expand_windows_env_vars("100%% sure"), "100% sure");
        assert_eq!(expand_windows_env_vars(r"C:\%UNCLOSED"), r"C:\%UNCLOSED");
    }

    #[test]
    fn known_variable_is_substituted() {
        let Ok(path) = std::env::var("PATH") else {
            return;
        };
        assert_eq!(expand_windows_env_vars("%PATH%/x"), format!("{path}/x"));
    }

    #[test]
    fn plain_candidates_pass_through() {
        assert_eq!(
            expand_candidate("/usr/bin/chromium"),
            Some(PathBuf::from("/usr/bin/chromium"))
        );
    }
}
