//! Byte-level validation of downloaded image candidates
//!
//! A candidate is reported only when its bytes fully decode as a raster
//! image and the decoded height meets the configured minimum. Anything
//! else (HTML error pages, truncated downloads, SVG) is a plain `false`.

use image::DynamicImage;
use log::trace;

use crate::utils::DEFAULT_MIN_IMAGE_HEIGHT;

/// Size policy applied to decoded images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageValidator {
    min_height: u32,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_IMAGE_HEIGHT)
    }
}

impl ImageValidator {
    #[must_use]
    pub const fn new(min_height: u32) -> Self {
        Self { min_height }
    }

    #[must_use]
    pub const fn min_height(&self) -> u32 {
        self.min_height
    }

    /// Decode `bytes` and return the image if it passes the size policy
    #[must_use]
    pub fn decode_valid(&self, bytes: &[u8]) -> Option<DynamicImage> {
        let decoded = match image::load_from_memory(bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                trace!("Rejecting {} bytes that do not decode as an image: {e}", bytes.len());
                return None;
            }
        };

        if decoded.height() < self.min_height {
            trace!(
                "Rejecting {}x{} image below minimum height {}",
                decoded.width(),
                decoded.height(),
                self.min_height
            );
            return None;
        }

        Some(decoded)
    }

    /// Whether `bytes` decode as an image at least `min_height` pixels tall
    #[must_use]
    pub fn is_valid(&self, bytes: &[u8]) -> bool {
        self.decode_valid(bytes).is_some()
    }
}

/// Validate with the default 200px policy
#[must_use]
pub fn is_valid_image(bytes: &[u8]) -> bool {
    ImageValidator::default().is_valid(bytes)
}
