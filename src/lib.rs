//! # docr
//!
//! Turn uploaded documents into recognised text.
//!
//! docr accepts a raster image (JPEG/PNG/BMP/TIFF) or a multi-page PDF,
//! normalises it into a uniform sequence of page rasters, runs a pluggable
//! OCR engine over each page, and returns per-page text lines with
//! confidence scores and bounding polygons. The OCR model itself is an
//! external capability behind the [`TextRecognizer`] trait; this crate owns
//! everything around it: format routing, decoding, PDF rasterisation, and
//! the result-aggregation contract.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (filename, bytes)
//!  │
//!  ├─ 1. Route      pick a handling path from the extension, or reject
//!  ├─ 2. Normalise  decode the image, or rasterise each PDF page at 2x
//!  ├─ 3. Recognise  one engine call per page, page order preserved
//!  └─ 4. Assemble   {"filename", "results": [{"page", "data": [...]}]}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docr::{process_document, EngineSettings, ProcessOptions, RemoteEngine, TextRecognizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine: Arc<dyn TextRecognizer> = Arc::new(RemoteEngine::new(
//!         "http://127.0.0.1:9292",
//!         EngineSettings::default(),
//!     ));
//!     let bytes = std::fs::read("invoice.pdf")?;
//!     let doc = process_document("invoice.pdf", bytes, &engine, &ProcessOptions::default()).await?;
//!     for page in &doc.results {
//!         for line in &page.data {
//!             println!("p{} [{:.2}] {}", page.page, line.confidence, line.text);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - One `PageResult` per input page, numbered contiguously from 1, in
//!   input order, or an error; never a partial document.
//! - Pages from image files and PDF pages hand the engine byte-identical
//!   raster layouts (3-channel BGR).
//! - An unsupported extension is rejected before any decode work.
//! - A page the engine finds no text on is a success with an empty line
//!   list, not an error.
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | The `docr-server` binary and axum HTTP facade |
//!
//! Disable `server` when embedding only the pipeline:
//! ```toml
//! docr = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod raster;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{EngineSettings, EngineSettingsBuilder, ProcessOptions};
pub use engine::{EngineError, RemoteEngine, TextRecognizer};
pub use error::DocrError;
pub use output::{Detection, DocumentResult, PageResult};
pub use process::process_document;
pub use raster::Raster;
