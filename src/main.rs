// Product image harvester
//
// Reads a list of product page URLs, renders each page in its own
// headless Chrome session, and writes a CSV report with thumbnails of the
// product images found on every page.

use anyhow::{Context, Result};
use clap::Parser;
use kodegen_tools_imagescrape::utils::{
    DEFAULT_CONTENT_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_PAGES, DEFAULT_MAX_POLL_ATTEMPTS,
    DEFAULT_MIN_IMAGE_HEIGHT, DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS,
};
use kodegen_tools_imagescrape::{HarvestConfig, harvest, load_url_list};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(version, about = "Harvest product images from rendered shop pages")]
struct Cli {
    /// Newline-delimited list of product page URLs
    #[arg(short, long, default_value = "url.txt")]
    input: PathBuf,

    /// Directory receiving the report, thumbnails and JSON summary
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Maximum number of browser sessions alive at once
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_MAX_CONCURRENT_PAGES,
        conflicts_with = "unbounded"
    )]
    concurrency: usize,

    /// Launch every URL at once
    #[arg(long)]
    unbounded: bool,

    /// Show the browser window (debug builds only)
    #[arg(long)]
    headed: bool,

    /// Minimum image height in pixels
    #[arg(long, default_value_t = DEFAULT_MIN_IMAGE_HEIGHT)]
    min_height: u32,

    /// Navigation timeout in seconds
    #[arg(long, default_value_t = DEFAULT_NAVIGATION_TIMEOUT_SECS)]
    navigation_timeout: u64,

    /// Timeout in seconds for a single content poll
    #[arg(long, default_value_t = DEFAULT_CONTENT_TIMEOUT_SECS)]
    content_timeout: u64,

    /// Seconds to wait before each content poll
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    poll_interval: u64,

    /// Content polls per page before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_POLL_ATTEMPTS)]
    max_polls: u32,

    /// Chrome/Chromium executable (skips discovery)
    #[arg(long)]
    browser: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<HarvestConfig> {
        let builder = HarvestConfig::builder()
            .output_dir(self.output_dir)
            .headless(!self.headed)
            .min_image_height(self.min_height)
            .navigation_timeout_secs(self.navigation_timeout)
            .content_timeout_secs(self.content_timeout)
            .poll_interval_secs(self.poll_interval)
            .max_poll_attempts(self.max_polls)
            .browser_executable(self.browser);

        let builder = if self.unbounded {
            builder.unbounded()
        } else {
            builder.max_concurrent_pages(self.concurrency)
        };

        builder.build()
    }
}

fn init_tracing() -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        // chromiumoxide logs every undecodable CDP event at error level
        Err(_) => EnvFilter::new("info").add_directive("chromiumoxide=off".parse()?),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let input = cli.input.clone();
    let config = cli.into_config().context("Invalid configuration")?;

    let urls = load_url_list(&input).await?;
    if urls.is_empty() {
        tracing::warn!("No URLs found in {}", input.display());
    }

    let output = harvest(&config, &urls).await?;

    tracing::info!(
        "{} of {} URLs succeeded. Report: {} Summary: {}",
        output.succeeded(),
        output.rows.len(),
        output.report_path.display(),
        output.summary_path.display()
    );
    Ok(())
}
