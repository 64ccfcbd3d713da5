//! Per-run accumulation of URL outcomes
//!
//! One `ResultStore` lives for exactly one batch run. It is shared by
//! `Arc` with every pipeline; all mutation goes through a single async
//! mutex so a record's read-modify-write can never interleave with another
//! pipeline's, even when callers await between steps.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::image_extractor::ImageCandidate;

/// Final status of one input URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Success,
    Failed,
}

impl RecordStatus {
    /// Label used in the report's status column
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one URL, accumulated for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub url: String,
    pub status: RecordStatus,
    pub candidates: Vec<ImageCandidate>,
}

impl ResultRecord {
    fn new(url: &str, status: RecordStatus) -> Self {
        Self {
            url: url.to_string(),
            status,
            candidates: Vec::new(),
        }
    }
}

/// Shared map from input URL to its `ResultRecord`
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Mutex<HashMap<String, ResultRecord>>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status of `url`, creating its record if this is the first write
    pub async fn set_status(&self, url: &str, status: RecordStatus) {
        let mut records = self.records.lock().await;
        records
            .entry(url.to_string())
            .and_modify(|record| record.status = status)
            .or_insert_with(|| ResultRecord::new(url, status));
    }

    /// Append candidates to `url` in order
    ///
    /// Candidates only exist for pages that rendered, so a record created
    /// here starts as `Success`.
    pub async fn append_candidates(&self, url: &str, candidates: Vec<ImageCandidate>) {
        let mut records = self.records.lock().await;
        records
            .entry(url.to_string())
            .or_insert_with(|| ResultRecord::new(url, RecordStatus::Success))
            .candidates
            .extend(candidates);
    }

    /// Mark `url` as failed unless a pipeline already recorded an outcome
    ///
    /// Used for pipelines that were abandoned (panicked) before writing.
    /// Returns true when a record was created.
    pub async fn ensure_recorded(&self, url: &str) -> bool {
        let mut records = self.records.lock().await;
        if records.contains_key(url) {
            return false;
        }
        records.insert(url.to_string(), ResultRecord::new(url, RecordStatus::Failed));
        true
    }

    /// Copy of every record, keyed by URL
    pub async fn snapshot(&self) -> HashMap<String, ResultRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}
