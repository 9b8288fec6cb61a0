//! The top-level document-processing entry point.
//!
//! [`process_document`] is the one operation the service facade calls:
//! route the upload by filename, normalise it into page rasters, recognise
//! each page, and assemble the final [`DocumentResult`]. Each invocation
//! owns its rasters exclusively and drops them when the result is built;
//! nothing is cached or persisted across requests.

use crate::config::ProcessOptions;
use crate::engine::TextRecognizer;
use crate::error::DocrError;
use crate::output::DocumentResult;
use crate::pipeline::{aggregate, decode, render, route};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Process one uploaded document end to end.
///
/// # Arguments
/// * `filename` - the name the caller uploaded the bytes under; drives
///   routing and is echoed back in the result
/// * `content`  - the raw uploaded bytes
/// * `engine`   - the recognition capability, shared across requests
/// * `options`  - per-run pipeline tuning
///
/// # Errors
/// Fails fast on the first problem: unsupported extension (before any
/// decode work), undecodable image, unopenable PDF or unrenderable page,
/// or an engine failure on any page. No partial results are returned.
pub async fn process_document(
    filename: &str,
    content: Vec<u8>,
    engine: &Arc<dyn TextRecognizer>,
    options: &ProcessOptions,
) -> Result<DocumentResult, DocrError> {
    let start = Instant::now();
    // Own the filename up front so the borrow of the `&str` parameter does
    // not live across the awaits below; holding an external parameter
    // lifetime across an await defeats the `Send` check when this future is
    // driven from an axum handler.
    let filename = filename.to_string();
    let engine = Arc::clone(engine);
    let kind = route::classify(&filename)?;

    let rasters = match kind {
        route::DocumentKind::Image => vec![decode::decode_image(&filename, &content)?],
        route::DocumentKind::Pdf => render::rasterise_pdf(&filename, content).await?,
    };

    let results = aggregate::recognise_document(engine, &rasters, options).await?;

    let document = DocumentResult {
        filename: filename.clone(),
        results,
    };

    info!(
        filename = %filename,
        pages = document.results.len(),
        lines = document.detection_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "document processed"
    );

    Ok(document)
}
