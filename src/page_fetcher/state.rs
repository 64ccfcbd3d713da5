//! Per-URL fetch state machine and its outcome types

use serde::{Deserialize, Serialize};

use super::page_timeout::FetchError;

/// Why a fetch did not produce markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// Navigation or a content pull exceeded its budget
    Timeout,
    /// Session start or navigation failed for another reason
    BrowserError,
    /// Every poll returned markup without an image tag
    MaxRetriesExceeded,
}

impl From<&FetchError> for FailureReason {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Timeout { .. } => Self::Timeout,
            FetchError::Browser(_) => Self::BrowserError,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::BrowserError => write!(f, "browser error"),
            Self::MaxRetriesExceeded => write!(f, "no image content after max retries"),
        }
    }
}

/// Result of one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rendered markup containing at least one image tag
    Success { markup: String },
    Failure { reason: FailureReason },
}

impl FetchOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(*reason),
        }
    }
}

/// States of a single fetch
///
/// ```text
/// Starting ──► Navigating ──► Polling{1} ──► ... ──► Polling{n}
///    │             │              │                      │
///    └──► Failed ◄─┴──────────────┴─► Succeeded          └──► Failed(MaxRetriesExceeded)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Starting,
    Navigating,
    /// About to run content poll number `attempt` (1-based)
    Polling { attempt: u32 },
    Succeeded(String),
    Failed(FailureReason),
}

impl FetchState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Navigating => "navigating",
            Self::Polling { .. } => "polling",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    /// Transition taken when a timed operation fails
    #[must_use]
    pub fn on_error(err: &FetchError) -> Self {
        Self::Failed(FailureReason::from(err))
    }

    /// Transition taken after a content poll returned without error
    #[must_use]
    pub fn after_poll(attempt: u32, max_attempts: u32, markup: String, marker: &str) -> Self {
        if markup.contains(marker) {
            Self::Succeeded(markup)
        } else if attempt >= max_attempts {
            Self::Failed(FailureReason::MaxRetriesExceeded)
        } else {
            Self::Polling {
                attempt: attempt + 1,
            }
        }
    }
}
