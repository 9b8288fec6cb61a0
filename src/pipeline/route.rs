//! Format routing: decide a handling path from the uploaded filename.
//!
//! Routing is a pure string decision and happens before any decoding, so a
//! `.docx` upload is rejected without wasting a single decode cycle. The
//! extension is only a routing hint: the image decoder re-validates actual
//! content from magic bytes, so a mislabeled file still ends up decoded
//! correctly (or rejected with a decode error, never silently mangled).

use crate::error::DocrError;
use std::path::Path;

/// Image extensions routed to the still-image decoder.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

/// How an upload will be turned into rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Single still image: exactly one raster.
    Image,
    /// PDF document: one raster per page, zero or more.
    Pdf,
}

/// Classify an upload by its filename extension, case-insensitively.
///
/// Fails with [`DocrError::UnsupportedFormat`] for unknown extensions and
/// for filenames with no extension at all.
pub fn classify(filename: &str) -> Result<DocumentKind, DocrError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => Ok(DocumentKind::Pdf),
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => Ok(DocumentKind::Image),
        _ => Err(DocrError::UnsupportedFormat {
            filename: filename.to_string(),
        }),
    }
}
