//! Pipeline stages for document processing.
//!
//! Each submodule implements exactly one transformation step, so every
//! stage is independently testable and a backend can be swapped without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! (filename, bytes) ──▶ route ──▶ decode | render ──▶ aggregate
//!                    (extension)  (image)  (pdfium)   (per-page OCR)
//! ```
//!
//! 1. [`route`]     - pick a handling path from the filename's extension;
//!    reject unknown formats before any bytes are touched
//! 2. [`decode`]    - sniff and decode still-image bytes into one raster
//! 3. [`render`]    - rasterise every PDF page at a fixed zoom; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 4. [`aggregate`] - drive the recognition engine once per page, in page
//!    order, and assemble the final document result

pub mod aggregate;
pub mod decode;
pub mod render;
pub mod route;
