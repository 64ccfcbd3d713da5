//! Candidate image downloads
//!
//! Streams each response with a hard size cap: `Content-Length` is checked
//! before reading, and the running total again while chunks arrive, since
//! the header is optional and can lie.

use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;

use super::errors::{ReportError, ReportResult};
use crate::config::HarvestConfig;
use crate::utils::constants::CHROME_USER_AGENT;

#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
}

impl ImageDownloader {
    pub fn new(timeout: Duration, max_bytes: usize) -> ReportResult<Self> {
        let client = Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .build()
            .map_err(ReportError::Client)?;

        Ok(Self {
            client,
            timeout,
            max_bytes,
        })
    }

    pub fn from_config(config: &HarvestConfig) -> ReportResult<Self> {
        Self::new(config.image_timeout(), config.max_image_bytes())
    }

    /// Download the raw bytes behind `url`
    pub async fn download(&self, url: &str) -> ReportResult<Vec<u8>> {
        let request_error = |source| ReportError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header("Accept", "image/avif,image/webp,image/apng,image/*,*/*;q=0.8")
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(ReportError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > self.max_bytes as u64 {
            return Err(ReportError::TooLarge {
                url: url.to_string(),
                size: expected_size,
                limit: self.max_bytes,
            });
        }

        let mut buffer = Vec::with_capacity(expected_size as usize);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(request_error)?;

            // Check before accumulating
            let new_total = buffer.len() + chunk.len();
            if new_total > self.max_bytes {
                return Err(ReportError::TooLarge {
                    url: url.to_string(),
                    size: new_total as u64,
                    limit: self.max_bytes,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer)
    }
}
