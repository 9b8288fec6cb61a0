//! Result types returned to callers.
//!
//! These structs serialise directly to the service's wire format:
//!
//! ```json
//! { "filename": "invoice.pdf",
//!   "results": [ { "page": 1,
//!                  "data": [ { "text": "Total: 42.00",
//!                              "confidence": 0.97,
//!                              "box": [[10.0, 12.0], [110.0, 12.0],
//!                                      [110.0, 30.0], [10.0, 30.0]] } ] } ] }
//! ```
//!
//! `results` always holds one entry per page of the input, in input order,
//! with `page` starting at 1. A page where the engine saw nothing has an
//! empty `data` list; that is a normal outcome, not an error.

use serde::{Deserialize, Serialize};

/// A single point of a detection polygon, `[x, y]` in pixel coordinates of
/// the rasterised page.
pub type PolygonPoint = [f64; 2];

/// One recognised text line on a page.
///
/// The polygon is carried through exactly as the engine produced it,
/// typically four corners of a (not necessarily axis-aligned) quadrilateral.
/// Confidence is the engine's score in `[0, 1]`, never re-normalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub text: String,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub polygon: Vec<PolygonPoint>,
}

/// All detections for one page, in the order the engine emitted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page index (page 1 is the first PDF page or the sole image).
    pub page: usize,
    pub data: Vec<Detection>,
}

impl PageResult {
    /// A page the engine found no text on.
    pub fn empty(page: usize) -> Self {
        Self { page, data: Vec::new() }
    }
}

/// The terminal artifact of processing one uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// The filename exactly as the caller supplied it.
    pub filename: String,
    pub results: Vec<PageResult>,
}

impl DocumentResult {
    /// Total number of detections across every page.
    pub fn detection_count(&self) -> usize {
        self.results.iter().map(|p| p.data.len()).sum()
    }
}
