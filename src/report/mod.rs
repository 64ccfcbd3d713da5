//! Report assembly from a finished batch
//!
//! For each successful URL the extracted candidates are downloaded
//! concurrently, validated by decoding, and every valid image is written
//! out as a JPEG thumbnail. Candidates that fail to download or validate
//! are left out silently; failed URLs keep their failure marker and get no
//! images.

pub mod csv_report;
pub mod downloader;
pub mod errors;
pub mod json_summary;

use futures::future::join_all;
use image::DynamicImage;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::HarvestConfig;
use crate::image_validator::ImageValidator;
use crate::result_store::{RecordStatus, ResultRecord};

pub use csv_report::{THUMBNAIL_SEPARATOR, report_file_name, write_csv_report};
pub use downloader::ImageDownloader;
pub use errors::{ReportError, ReportResult};
pub use json_summary::save_json_summary;

/// One report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub url: String,
    pub status: RecordStatus,
    /// Thumbnail files, relative to the output directory
    pub thumbnails: Vec<PathBuf>,
}

impl ReportRow {
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.thumbnails.len()
    }
}

/// Turns a batch snapshot into report rows and thumbnail files
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    downloader: ImageDownloader,
    validator: ImageValidator,
    output_dir: PathBuf,
    thumbnail_subdir: String,
    thumbnail_size: u32,
}

impl ReportBuilder {
    /// Thumbnails go to `<output_dir>/thumbnails_<timestamp>/`
    #[must_use]
    pub fn new(
        downloader: ImageDownloader,
        validator: ImageValidator,
        output_dir: impl Into<PathBuf>,
        timestamp: &str,
        thumbnail_size: u32,
    ) -> Self {
        Self {
            downloader,
            validator,
            output_dir: output_dir.into(),
            thumbnail_subdir: format!("thumbnails_{timestamp}"),
            thumbnail_size,
        }
    }

    pub fn from_config(config: &HarvestConfig, timestamp: &str) -> ReportResult<Self> {
        Ok(Self::new(
            ImageDownloader::from_config(config)?,
            ImageValidator::new(config.min_image_height()),
            config.output_dir(),
            timestamp,
            config.thumbnail_size(),
        ))
    }

    /// Directory receiving this run's thumbnails
    #[must_use]
    pub fn thumbnail_dir(&self) -> PathBuf {
        self.output_dir.join(&self.thumbnail_subdir)
    }

    /// Build one row per unique URL in input order
    ///
    /// A URL missing from `snapshot` is reported as failed.
    pub async fn build(
        &self,
        urls: &[String],
        snapshot: &HashMap<String, ResultRecord>,
    ) -> ReportResult<Vec<ReportRow>> {
        let thumbnail_dir = self.thumbnail_dir();
        tokio::fs::create_dir_all(&thumbnail_dir)
            .await
            .map_err(|e| ReportError::io(&thumbnail_dir, e))?;

        let mut seen = HashSet::new();
        let mut rows = Vec::with_capacity(snapshot.len());

        for url in urls {
            if !seen.insert(url.as_str()) {
                continue;
            }
            let row_index = rows.len() + 1;

            let row = match snapshot.get(url) {
                Some(record) if record.status == RecordStatus::Success => {
                    let thumbnails = self.thumbnails_for(row_index, record).await?;
                    ReportRow {
                        url: url.clone(),
                        status: RecordStatus::Success,
                        thumbnails,
                    }
                }
                _ => ReportRow {
                    url: url.clone(),
                    status: RecordStatus::Failed,
                    thumbnails: Vec::new(),
                },
            };
            rows.push(row);
        }

        info!(
            "Assembled {} report rows ({} thumbnails)",
            rows.len(),
            rows.iter().map(ReportRow::image_count).sum::<usize>()
        );
        Ok(rows)
    }

    /// Download, validate and thumbnail every candidate of one record
    async fn thumbnails_for(
        &self,
        row_index: usize,
        record: &ResultRecord,
    ) -> ReportResult<Vec<PathBuf>> {
        let downloads = record.candidates.iter().map(|candidate| async move {
            let url = candidate.resolved_url.as_str();
            match self.downloader.download(url).await {
                Ok(bytes) => {
                    let decoded = self.validator.decode_valid(&bytes);
                    if decoded.is_none() {
                        debug!("Excluding {url}: not a valid image of sufficient height");
                    }
                    decoded
                }
                Err(e) => {
                    debug!("Excluding {url}: {e}");
                    None
                }
            }
        });

        let mut thumbnails = Vec::new();
        for image in join_all(downloads).await.into_iter().flatten() {
            let name = format!("{row_index:04}_{:02}.jpg", thumbnails.len() + 1);
            let relative = Path::new(&self.thumbnail_subdir).join(name);
            self.write_thumbnail(&image, &self.output_dir.join(&relative))?;
            thumbnails.push(relative);
        }

        Ok(thumbnails)
    }

    fn write_thumbnail(&self, image: &DynamicImage, path: &Path) -> ReportResult<()> {
        let thumbnail = image.thumbnail(self.thumbnail_size, self.thumbnail_size);
        // JPEG has no alpha channel
        DynamicImage::ImageRgb8(thumbnail.to_rgb8())
            .save_with_format(path, image::ImageFormat::Jpeg)?;
        Ok(())
    }
}
