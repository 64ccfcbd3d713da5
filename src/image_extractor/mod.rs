//! Product image extraction from rendered markup
//!
//! Two stages:
//! 1. [`pruning`] detaches page chrome and decorative widgets.
//! 2. Every remaining `<img>` with a `src` goes through the [`filters`]
//!    denylist and is resolved against the page URL.
//!
//! Parsing never fails: `scraper` (html5ever) recovers from any malformed
//! input, so a broken page yields whatever images could be recovered.

pub mod filters;
pub mod pruning;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::utils::{is_valid_url, resolve_url};

pub use filters::{SkipReason, select_source};
pub use pruning::{class_is_pruned, collect_pruned, prune_document, prune_markup};

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("IMG_SELECTOR: hardcoded selector is valid"));

/// One extracted, absolute image URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageCandidate {
    /// Absolute http(s) URL of the image
    pub resolved_url: String,
    /// Page the image was found on
    pub source_url: String,
}

/// Extract candidate product images from `markup` in document order
#[must_use]
pub fn extract(markup: &str, page_url: &str) -> Vec<ImageCandidate> {
    let mut document = Html::parse_document(markup);
    let pruned = prune_document(&mut document);
    trace!(page_url, pruned, "Pruned structural and decorative subtrees");

    let mut candidates = Vec::new();
    let mut discovered = 0usize;

    // Walk from the tree root: pruning may have detached <html> itself
    let images = document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| IMG_SELECTOR.matches(element));

    for img in images {
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        discovered += 1;

        let reference = match select_source(src, img.value().attr(filters::LAZY_SOURCE_ATTR)) {
            Ok(reference) => reference,
            Err(reason) => {
                trace!(page_url, src, %reason, "Skipping image");
                continue;
            }
        };

        match resolve_url(page_url, reference) {
            Ok(resolved) if is_valid_url(&resolved) => candidates.push(ImageCandidate {
                resolved_url: resolved,
                source_url: page_url.to_string(),
            }),
            Ok(resolved) => {
                debug!(page_url, %resolved, "Skipping image with non-http URL");
            }
            Err(e) => {
                debug!(page_url, reference, "Skipping unresolvable image reference: {e:#}");
            }
        }
    }

    debug!(
        page_url,
        discovered,
        kept = candidates.len(),
        "Extracted product image candidates"
    );
    candidates
}
