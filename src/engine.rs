//! Recognition engines.
//!
//! The pipeline does not implement OCR. It depends on the steady-state
//! contract below: hand an engine one page raster, get back zero or more
//! text-line detections. Engines are constructed once at process start from
//! [`EngineSettings`](crate::config::EngineSettings) and injected as an
//! `Arc<dyn TextRecognizer>`, so tests run against in-memory doubles and a
//! single process can host differently-configured engines side by side.
//!
//! Engines must tolerate concurrent `recognize` calls from multiple
//! documents in flight; serialising access to a shared accelerator is the
//! engine's own business.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::debug;

use crate::config::EngineSettings;
use crate::output::Detection;
use crate::raster::Raster;

/// Failures internal to a recognition engine.
///
/// The aggregator converts these into
/// [`DocrError::RecognitionFailed`](crate::error::DocrError::RecognitionFailed)
/// together with the page index, which the engine itself never knows.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine endpoint answered with a non-success status.
    #[error("engine returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The engine could not be reached at all.
    #[error("engine request failed: {0}")]
    Transport(String),

    /// The page image could not be encoded for the wire.
    #[error("failed to encode page image: {0}")]
    Encode(String),
}

/// An OCR capability: text-line detection plus recognition over one raster.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognise all text lines on one page. An empty vec is a valid answer
    /// for a blank page. Calls are independent; any ordering across pages is
    /// imposed by the caller, not required here.
    async fn recognize(&self, page: &Raster) -> Result<Vec<Detection>, EngineError>;

    /// Whether the engine is currently able to serve requests.
    async fn is_available(&self) -> bool;

    /// Whether recognition runs on a hardware accelerator. Surfaced through
    /// the health endpoint as an operational signal.
    fn is_accelerated(&self) -> bool;
}

/// A recognizer backed by an OCR model server spoken to over HTTP.
///
/// Each page is shipped as a lossless PNG (base64 in a JSON body) to
/// `{base_url}/predict`; the model server answers with the detection list
/// in the same shape the service ultimately returns. The
/// orientation-classification flag and language from [`EngineSettings`]
/// are forwarded on every request.
pub struct RemoteEngine {
    base_url: String,
    settings: EngineSettings,
    client: reqwest::Client,
}

impl RemoteEngine {
    pub fn new(base_url: impl Into<String>, settings: EngineSettings) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            settings,
            client: reqwest::Client::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}

#[async_trait]
impl TextRecognizer for RemoteEngine {
    async fn recognize(&self, page: &Raster) -> Result<Vec<Detection>, EngineError> {
        let png = page.to_png().map_err(|e| EngineError::Encode(e.to_string()))?;
        let image_b64 = STANDARD.encode(&png);
        debug!(
            bytes = png.len(),
            width = page.width(),
            height = page.height(),
            "sending page to engine"
        );

        let request = serde_json::json!({
            "image": image_b64,
            "cls": self.settings.angle_classification,
            "lang": self.settings.language,
        });

        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Api { status, body });
        }

        response
            .json::<Vec<Detection>>()
            .await
            .map_err(|e| EngineError::Transport(format!("invalid engine response: {e}")))
    }

    async fn is_available(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn is_accelerated(&self) -> bool {
        self.settings.use_gpu
    }
}
