//! Result aggregation: drive the engine once per page and assemble the
//! per-page results.
//!
//! The output contract is strict: one [`PageResult`] per input raster, in
//! input order, pages numbered from 1. The default mode is sequential,
//! which also aborts at the earliest possible point when a page fails.
//! The concurrent mode overlaps engine calls but buffers them in order, so
//! page N's result always lands at index N-1 no matter which call finished
//! first.
//!
//! Failure policy is whole-document: the first engine error aborts the run
//! with the offending 1-based page index, and no partial result escapes.
//! A page with zero detections is not a failure; it simply yields an empty
//! detection list.

use crate::config::ProcessOptions;
use crate::engine::TextRecognizer;
use crate::error::DocrError;
use crate::output::PageResult;
use crate::raster::Raster;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

/// Recognise every raster of a document, preserving page order.
pub async fn recognise_document(
    engine: &Arc<dyn TextRecognizer>,
    rasters: &[Raster],
    options: &ProcessOptions,
) -> Result<Vec<PageResult>, DocrError> {
    if options.recognition_concurrency <= 1 {
        recognise_sequential(engine, rasters).await
    } else {
        recognise_concurrent(engine, rasters, options.recognition_concurrency).await
    }
}

/// One page at a time, in order. Fails fast: a broken page means later
/// pages are never sent to the engine.
async fn recognise_sequential(
    engine: &Arc<dyn TextRecognizer>,
    rasters: &[Raster],
) -> Result<Vec<PageResult>, DocrError> {
    let mut results = Vec::with_capacity(rasters.len());

    for (index, raster) in rasters.iter().enumerate() {
        let page = index + 1;
        let data = engine
            .recognize(raster)
            .await
            .map_err(|e| DocrError::RecognitionFailed {
                page,
                detail: e.to_string(),
            })?;
        debug!(page, lines = data.len(), "page recognised");
        results.push(PageResult { page, data });
    }

    Ok(results)
}

/// Up to `concurrency` engine calls in flight; results are buffered back
/// into page order before collection, so the output is indistinguishable
/// from the sequential mode.
async fn recognise_concurrent(
    engine: &Arc<dyn TextRecognizer>,
    rasters: &[Raster],
    concurrency: usize,
) -> Result<Vec<PageResult>, DocrError> {
    let jobs = rasters
        .iter()
        .enumerate()
        .map(|(index, raster)| (Arc::clone(engine), index, raster))
        .collect::<Vec<_>>();
    stream::iter(jobs)
        .map(recognise_page)
        .buffered(concurrency)
        .try_collect()
        .await
}

/// Recognise a single page and tag it with its 1-based index. Taken as a
/// free `fn` (rather than an inline `.map` closure) so its future is
/// higher-ranked over the raster borrow's lifetime; a closure's returned
/// future is not, which makes the `buffered` stream fail the `Send` check
/// when this path is reached through an axum handler.
async fn recognise_page(
    (engine, index, raster): (Arc<dyn TextRecognizer>, usize, &Raster),
) -> Result<PageResult, DocrError> {
    let page = index + 1;
    let data = engine
        .recognize(raster)
        .await
        .map_err(|e| DocrError::RecognitionFailed {
            page,
            detail: e.to_string(),
        })?;
    debug!(page, lines = data.len(), "page recognised");
    Ok(PageResult { page, data })
}
