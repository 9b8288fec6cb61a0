//! Error types for the docr library.
//!
//! Every variant is fail-fast: the first failure in a document's pipeline
//! aborts the whole request. There is no retry and no partial-result
//! degradation; a caller either gets a complete [`crate::output::DocumentResult`]
//! covering every page or an error naming the first page that broke.
//!
//! [`DocrError::UnsupportedFormat`] is the only caller-correctable kind and
//! is raised before any decode work happens. The server layer owns the
//! mapping to HTTP status codes; nothing in this module knows about
//! transport.

use thiserror::Error;

/// All errors returned by the document-processing pipeline.
#[derive(Debug, Error)]
pub enum DocrError {
    /// The uploaded filename carries an extension the router does not
    /// recognise (or no extension at all). Raised before any bytes are
    /// inspected.
    #[error("unsupported file format: '{filename}' (only PDF and JPEG/PNG/BMP/TIFF uploads are accepted)")]
    UnsupportedFormat { filename: String },

    /// The bytes routed to the image decoder could not be parsed by any
    /// supported codec, or decoded to a zero-size image.
    #[error("failed to decode image '{filename}': {detail}")]
    DecodeFailed { filename: String, detail: String },

    /// The byte stream is not a valid PDF container.
    #[error("failed to open PDF '{filename}': {detail}")]
    PdfOpenFailed { filename: String, detail: String },

    /// A specific page of an otherwise-openable PDF failed to rasterise.
    /// The whole document is abandoned; no earlier pages are returned.
    #[error("rasterisation failed on page {page} of '{filename}': {detail}")]
    RasterisationFailed {
        page: usize,
        filename: String,
        detail: String,
    },

    /// The recognition engine failed on a page. Carries the 1-based page
    /// index so operators can tell which page of a large document broke.
    #[error("text recognition failed on page {page}: {detail}")]
    RecognitionFailed { page: usize, detail: String },

    /// Unexpected internal error (a joined render task panicked, etc.).
    #[error("internal error: {0}")]
    Internal(String),
}

impl DocrError {
    /// Whether this error was caused by the caller's input naming rather
    /// than by processing. The service facade uses this to pick between a
    /// bad-request and an internal-error response.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, DocrError::UnsupportedFormat { .. })
    }

    /// The 1-based page index the error refers to, where one applies.
    pub fn page(&self) -> Option<usize> {
        match self {
            DocrError::RasterisationFailed { page, .. }
            | DocrError::RecognitionFailed { page, .. } => Some(*page),
            _ => None,
        }
    }
}
