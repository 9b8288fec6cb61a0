//! PDF rasterisation: render every page to a canonical raster via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a thread
//! pool designed for blocking operations, so the async workers keep
//! serving other requests during CPU-heavy rendering.
//!
//! ## Why a fixed 2x zoom?
//!
//! PDF pages carry their own point-based geometry; rendered at 1x, body
//! text often lands below the pixel height recognition models need.
//! Rendering at twice the native resolution in both axes measurably
//! improves recognition of small print, while keeping page bitmaps within
//! ordinary memory bounds. The zoom is part of the pipeline contract, not
//! a per-request knob.

use crate::error::DocrError;
use crate::raster::Raster;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// Scale factor applied uniformly in both axes when rasterising PDF pages.
pub const PDF_RENDER_ZOOM: f32 = 2.0;

/// Rasterise all pages of a PDF, in page-tree order.
///
/// A zero-page PDF yields an empty vec, which downstream treats as a valid
/// zero-page document. Any page failing to render aborts the whole
/// document: callers never see a partial page sequence.
pub async fn rasterise_pdf(filename: &str, bytes: Vec<u8>) -> Result<Vec<Raster>, DocrError> {
    let name = filename.to_string();
    tokio::task::spawn_blocking(move || rasterise_pdf_blocking(&name, bytes))
        .await
        .map_err(|e| DocrError::Internal(format!("render task panicked: {e}")))?
}

/// Blocking implementation of page rasterisation.
fn rasterise_pdf_blocking(filename: &str, bytes: Vec<u8>) -> Result<Vec<Raster>, DocrError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|e| DocrError::PdfOpenFailed {
                filename: filename.to_string(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    info!(filename, pages = pages.len(), "PDF loaded");

    let render_config = PdfRenderConfig::new().scale_page_by_factor(PDF_RENDER_ZOOM);

    let mut rasters = Vec::with_capacity(pages.len() as usize);

    for (index, page) in pages.iter().enumerate() {
        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| DocrError::RasterisationFailed {
                    page: index + 1,
                    filename: filename.to_string(),
                    detail: format!("{e:?}"),
                })?;

        let image = bitmap.as_image();
        debug!(
            page = index + 1,
            width = image.width(),
            height = image.height(),
            "rendered page"
        );

        rasters.push(Raster::from_dynamic(&image));
    }

    Ok(rasters)
}
