//! Error types for report assembly

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download of {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Image at {url} is too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { url: String, size: u64, limit: usize },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode thumbnail: {0}")]
    Thumbnail(#[from] image::ImageError),

    #[error("Failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
