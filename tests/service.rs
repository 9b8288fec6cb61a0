//! Integration tests for the docr pipeline and HTTP facade.
//!
//! Everything here runs against an in-memory stub engine with images
//! generated on the fly, so no model server is required. Tests that need a
//! real pdfium library are gated behind the `DOCR_PDFIUM_TESTS` environment
//! variable so they do not run in CI unless explicitly requested.
//!
//! Run the gated tests with:
//!   DOCR_PDFIUM_TESTS=1 cargo test --test service -- --nocapture

use async_trait::async_trait;
use docr::pipeline::render;
use docr::server::{app, AppState};
use docr::{
    process_document, Detection, DocrError, EngineError, ProcessOptions, Raster, TextRecognizer,
};
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────

/// A deterministic engine double: one fixed line per page, call counting,
/// optional hard failure.
struct StubEngine {
    calls: AtomicUsize,
    fail: bool,
    accelerated: bool,
}

impl StubEngine {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            accelerated: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }
}

#[async_trait]
impl TextRecognizer for StubEngine {
    async fn recognize(&self, _page: &Raster) -> Result<Vec<Detection>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EngineError::Transport("engine offline".into()));
        }
        Ok(vec![Detection {
            text: "hello world".into(),
            confidence: 0.9,
            polygon: vec![[1.0, 1.0], [50.0, 1.0], [50.0, 12.0], [1.0, 12.0]],
        }])
    }

    async fn is_available(&self) -> bool {
        !self.fail
    }

    fn is_accelerated(&self) -> bool {
        self.accelerated
    }
}

fn png_bytes() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 10, Rgb([250, 250, 250])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Build a structurally valid PDF with `pages` empty pages of 200x100 pt,
/// computing xref offsets so strict parsers accept it.
fn minimal_pdf(pages: usize) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 3 + i)).collect();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".into());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages
    ));
    for _ in 0..pages {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 100] >>".into());
    }

    let mut pdf = Vec::new();
    pdf.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, obj) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, obj).as_bytes());
    }
    let xref_at = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for off in offsets {
        pdf.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    pdf
}

/// Skip pdfium-bound tests unless explicitly enabled.
macro_rules! skip_unless_pdfium {
    () => {
        if std::env::var("DOCR_PDFIUM_TESTS").is_err() {
            println!("SKIP: set DOCR_PDFIUM_TESTS=1 (with a pdfium library installed) to run");
            return;
        }
    };
}

// ── Pipeline tests (no pdfium, no network) ───────────────────────────────

#[tokio::test]
async fn single_image_upload_yields_exactly_one_page_numbered_one() {
    let engine: Arc<dyn TextRecognizer> = Arc::new(StubEngine::ok());
    let doc = process_document("scan.png", png_bytes(), &engine, &ProcessOptions::default())
        .await
        .unwrap();

    assert_eq!(doc.filename, "scan.png");
    assert_eq!(doc.results.len(), 1);
    assert_eq!(doc.results[0].page, 1);
    assert_eq!(doc.results[0].data[0].text, "hello world");
}

#[tokio::test]
async fn unsupported_extension_is_rejected_before_any_work() {
    let engine = Arc::new(StubEngine::ok());
    let dyn_engine: Arc<dyn TextRecognizer> = engine.clone();

    // Valid PNG bytes under a rejected name: the error must be about the
    // format, not the content, proving no decode was attempted.
    let err = process_document("scan.docx", png_bytes(), &dyn_engine, &ProcessOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_unsupported_format());
    assert!(err.to_string().contains("scan.docx"));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn corrupt_image_bytes_fail_with_decode_error_and_no_engine_calls() {
    let engine = Arc::new(StubEngine::ok());
    let dyn_engine: Arc<dyn TextRecognizer> = engine.clone();

    let err = process_document(
        "photo.jpg",
        b"not an image at all".to_vec(),
        &dyn_engine,
        &ProcessOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DocrError::DecodeFailed { .. }));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn engine_failure_fails_the_request_with_the_page_index() {
    let engine: Arc<dyn TextRecognizer> = Arc::new(StubEngine::failing());
    let err = process_document("scan.png", png_bytes(), &engine, &ProcessOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DocrError::RecognitionFailed { page: 1, .. }));
    assert!(err.to_string().contains("engine offline"));
}

#[tokio::test]
async fn processing_identical_bytes_twice_is_idempotent() {
    let engine: Arc<dyn TextRecognizer> = Arc::new(StubEngine::ok());
    let bytes = png_bytes();

    let first = process_document("scan.png", bytes.clone(), &engine, &ProcessOptions::default())
        .await
        .unwrap();
    let second = process_document("scan.png", bytes, &engine, &ProcessOptions::default())
        .await
        .unwrap();

    assert_eq!(first, second);
}

// ── HTTP facade tests ────────────────────────────────────────────────────

mod http {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    const BOUNDARY: &str = "docr-test-boundary";

    fn upload_request(filename: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/ocr")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_status_and_acceleration() {
        let state = AppState::new(
            Arc::new(StubEngine {
                accelerated: true,
                ..StubEngine::ok()
            }),
            ProcessOptions::default(),
        );

        let response = app(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["accelerated"], true);
    }

    #[tokio::test]
    async fn ocr_returns_the_document_result_as_json() {
        let state = AppState::new(Arc::new(StubEngine::ok()), ProcessOptions::default());

        let response = app(state)
            .oneshot(upload_request("scan.png", &png_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["filename"], "scan.png");
        assert_eq!(json["results"][0]["page"], 1);
        let line = &json["results"][0]["data"][0];
        assert_eq!(line["text"], "hello world");
        assert_eq!(line["confidence"], 0.9);
        assert_eq!(line["box"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unknown_extension_maps_to_bad_request() {
        let state = AppState::new(Arc::new(StubEngine::ok()), ProcessOptions::default());

        let response = app(state)
            .oneshot(upload_request("scan.docx", b"whatever"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "UNSUPPORTED_FORMAT");
        assert!(json["error"].as_str().unwrap().contains("scan.docx"));
    }

    #[tokio::test]
    async fn decode_failure_maps_to_internal_error() {
        let state = AppState::new(Arc::new(StubEngine::ok()), ProcessOptions::default());

        let response = app(state)
            .oneshot(upload_request("photo.jpg", b"garbage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "PROCESSING_FAILED");
    }

    #[tokio::test]
    async fn missing_file_field_maps_to_bad_request() {
        let state = AppState::new(Arc::new(StubEngine::ok()), ProcessOptions::default());

        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/ocr")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
    }
}

// ── PDF tests (need a pdfium library; env-gated) ─────────────────────────

#[tokio::test]
async fn pdf_rasterises_one_page_per_tree_entry_at_double_resolution() {
    skip_unless_pdfium!();

    let rasters = render::rasterise_pdf("three.pdf", minimal_pdf(3))
        .await
        .expect("valid PDF should rasterise");

    assert_eq!(rasters.len(), 3);
    for raster in &rasters {
        // 200x100 pt page at the fixed 2x zoom
        assert_eq!(raster.width(), 400);
        assert_eq!(raster.height(), 200);
    }
}

#[tokio::test]
async fn pdf_upload_flows_through_to_one_page_result_per_page() {
    skip_unless_pdfium!();

    let engine: Arc<dyn TextRecognizer> = Arc::new(StubEngine::ok());
    let doc = process_document("three.pdf", minimal_pdf(3), &engine, &ProcessOptions::default())
        .await
        .unwrap();

    let pages: Vec<usize> = doc.results.iter().map(|p| p.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
}

#[tokio::test]
async fn zero_page_pdf_yields_a_zero_page_document_not_an_error() {
    skip_unless_pdfium!();

    let engine: Arc<dyn TextRecognizer> = Arc::new(StubEngine::ok());
    let doc = process_document("empty.pdf", minimal_pdf(0), &engine, &ProcessOptions::default())
        .await
        .unwrap();

    assert!(doc.results.is_empty());
}

#[tokio::test]
async fn garbage_bytes_with_pdf_name_fail_to_open() {
    skip_unless_pdfium!();

    let err = render::rasterise_pdf("broken.pdf", b"%PDF-not really".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, DocrError::PdfOpenFailed { .. }));
}
