//! Timeout utilities for page operations
//!
//! Every suspension point of a fetch (launch, navigation, content pull) is
//! wrapped here so a stalled browser turns into a `FetchError::Timeout`
//! instead of hanging the pipeline.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Error raised by a browser operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The operation did not finish within its budget
    #[error("{operation} timeout after {} seconds", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Session or navigation failure not caused by a timeout
    #[error("Browser error: {0}")]
    Browser(String),
}

impl FetchError {
    /// Wrap any displayable browser-side error, keeping its context chain
    pub fn browser(err: impl std::fmt::Display) -> Self {
        Self::Browser(format!("{err:#}"))
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Wrap an async page operation with an explicit timeout
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err(FetchError::Timeout)` - The budget elapsed first; the operation is dropped
/// * `Err(e)` - The operation itself failed
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &'static str,
) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            operation: operation_name,
            after: timeout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn elapsed_budget_is_a_timeout() {
        let result: Result<(), _> = with_page_timeout(
            std::future::pending(),
            Duration::from_secs(5),
            "Content fetch",
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Content fetch timeout after 5 seconds");
    }

    #[tokio::test]
    async fn operation_errors_pass_through() {
        let result: Result<(), _> = with_page_timeout(
            async { Err(FetchError::browser("net::ERR_NAME_NOT_RESOLVED")) },
            Duration::from_secs(5),
            "Page navigation",
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            FetchError::Browser("net::ERR_NAME_NOT_RESOLVED".to_string())
        );
    }
}
