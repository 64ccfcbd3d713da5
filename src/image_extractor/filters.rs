//! Heuristic denylist applied to image `src` values
//!
//! Each rule rejects a class of decorative or placeholder asset that is
//! common on Korean e-commerce platforms (cafe24 in particular).

/// Platform-default placeholder host
pub const PLACEHOLDER_HOST_MARKER: &str = "//img.echosting.cafe24.com/";

/// Skin/theme asset directory
pub const THEME_PATH_MARKER: &str = "/theme/";

/// Substrings (matched against the lower-cased source) of decorative assets
pub const DECORATIVE_MARKERS: &[&str] = &["facebook", "icon", "logo", "common", "banner", "brand"];

/// Marker of an inline data URI that cannot be downloaded
pub const BASE64_MARKER: &str = ";base64,";

/// Lazy-load attribute holding the real image when `src` is a data URI
pub const LAZY_SOURCE_ATTR: &str = "ec-data-src";

/// Why an image node was excluded from the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Svg,
    PlaceholderHost,
    ThemeAsset,
    Decorative(&'static str),
    /// Inline data URI with no lazy-load fallback
    EmbeddedWithoutFallback,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Svg => write!(f, "svg resource"),
            Self::PlaceholderHost => write!(f, "platform placeholder host"),
            Self::ThemeAsset => write!(f, "theme asset"),
            Self::Decorative(marker) => write!(f, "decorative marker '{marker}'"),
            Self::EmbeddedWithoutFallback => write!(f, "base64 data without {LAZY_SOURCE_ATTR}"),
        }
    }
}

/// Run the denylist over a `src` value
///
/// Returns the reference to resolve: `src` itself, or the lazy-load
/// fallback when `src` is an inline data URI. The fallback is taken as-is;
/// the denylist applies to `src` only.
pub fn select_source<'a>(src: &'a str, lazy_src: Option<&'a str>) -> Result<&'a str, SkipReason> {
    let lowered = src.to_lowercase();

    if lowered.ends_with(".svg") {
        return Err(SkipReason::Svg);
    }
    if src.contains(PLACEHOLDER_HOST_MARKER) {
        return Err(SkipReason::PlaceholderHost);
    }
    if src.contains(THEME_PATH_MARKER) {
        return Err(SkipReason::ThemeAsset);
    }
    if let Some(marker) = DECORATIVE_MARKERS.iter().copied().find(|m| lowered.contains(m)) {
        return Err(SkipReason::Decorative(marker));
    }

    if src.contains(BASE64_MARKER) {
        return lazy_src.ok_or(SkipReason::EmbeddedWithoutFallback);
    }

    Ok(src)
}
