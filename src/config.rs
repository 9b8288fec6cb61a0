//! Configuration types.
//!
//! [`EngineSettings`] is everything a recognition engine needs to know at
//! construction time. It is read once at process start and handed to the
//! engine's constructor; nothing re-reads configuration per request, so two
//! requests in flight always see the same engine behaviour.
//!
//! [`ProcessOptions`] tunes how the pipeline itself drives an engine and is
//! deliberately tiny: the rendering zoom is a fixed contract (see
//! [`crate::pipeline::render::PDF_RENDER_ZOOM`]), not a knob.

use serde::{Deserialize, Serialize};

/// One-time initialisation parameters for a recognition engine.
///
/// Built via [`EngineSettings::builder()`] or [`EngineSettings::default()`].
///
/// # Example
/// ```rust
/// use docr::EngineSettings;
///
/// let settings = EngineSettings::builder()
///     .use_gpu(false)
///     .language("en")
///     .build();
/// assert!(!settings.use_gpu);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Run recognition on a hardware accelerator. Default: true.
    ///
    /// With no accelerator present engines fall back to CPU; the flag then
    /// only changes what `/health` reports.
    pub use_gpu: bool,

    /// Accelerator memory budget in megabytes. Default: 4000.
    pub gpu_memory_mb: u32,

    /// Enable the text-orientation classification stage, which lets the
    /// model read lines rotated 180 degrees at a small latency cost.
    /// Default: true.
    pub angle_classification: bool,

    /// Recognition language code understood by the engine. Default: "ch".
    pub language: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            use_gpu: true,
            gpu_memory_mb: 4000,
            angle_classification: true,
            language: "ch".to_string(),
        }
    }
}

impl EngineSettings {
    pub fn builder() -> EngineSettingsBuilder {
        EngineSettingsBuilder {
            settings: Self::default(),
        }
    }
}

/// Builder for [`EngineSettings`].
#[derive(Debug)]
pub struct EngineSettingsBuilder {
    settings: EngineSettings,
}

impl EngineSettingsBuilder {
    pub fn use_gpu(mut self, v: bool) -> Self {
        self.settings.use_gpu = v;
        self
    }

    pub fn gpu_memory_mb(mut self, mb: u32) -> Self {
        self.settings.gpu_memory_mb = mb;
        self
    }

    pub fn angle_classification(mut self, v: bool) -> Self {
        self.settings.angle_classification = v;
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.settings.language = lang.into();
        self
    }

    pub fn build(self) -> EngineSettings {
        self.settings
    }
}

/// Options for one document-processing run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// How many recognition calls may overlap within one document.
    ///
    /// 1 (the default) processes pages strictly in order, which also gives
    /// the earliest possible abort when a page fails. Values above 1 overlap
    /// engine calls; output order is restored regardless, so the response
    /// shape is identical either way.
    pub recognition_concurrency: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            recognition_concurrency: 1,
        }
    }
}

impl ProcessOptions {
    pub fn with_concurrency(n: usize) -> Self {
        Self {
            recognition_concurrency: n.max(1),
        }
    }
}
