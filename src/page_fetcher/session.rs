//! Headless-browser capability used by the fetcher
//!
//! The fetcher only needs four operations: start a session, navigate,
//! read the rendered markup, stop. Keeping them behind traits lets the
//! polling logic run against scripted sessions in tests.

use std::future::Future;

use super::page_timeout::FetchError;

/// A navigated page whose current DOM can be serialized
pub trait RenderedPage: Send + Sync {
    /// Serialize the page's current, script-modified markup
    fn content(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// One isolated browser context, used for a single URL
pub trait BrowserSession: Send + Sync {
    type Page: RenderedPage;

    /// Navigate to `url` and return the loaded page
    fn get(&self, url: &str) -> impl Future<Output = Result<Self::Page, FetchError>> + Send;

    /// Release the session
    ///
    /// Consumes the session, so it can be released at most once.
    fn stop(self) -> impl Future<Output = ()> + Send;
}

/// Factory for fresh sessions
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession;

    /// One-time setup shared by every session, run before the batch starts
    ///
    /// Work done here is not charged to any session's launch timeout.
    fn prepare(&self) -> impl Future<Output = Result<(), FetchError>> + Send {
        async { Ok(()) }
    }

    fn start(&self) -> impl Future<Output = Result<Self::Session, FetchError>> + Send;
}
