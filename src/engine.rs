//! OCR engine boundary.
//!
//! The recognition engine itself is an external collaborator — this module
//! only defines the narrow interface the pipeline needs from it:
//! binarized PNG bytes in, recognized text out, verbose progress messages
//! forwarded to an observer on the side.
//!
//! [`MockOcrEngine`] is always available and is what the test suite uses;
//! a real Tesseract binding ships behind the `tesseract` feature so the
//! default build carries no system-library requirement.

use crate::progress::ExtractionProgressCallback;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed multilingual model set: English, French, Spanish and Arabic
/// simultaneously active. Latin and Arabic scripts cover the receipts and
/// scans this pipeline was built for.
pub const DEFAULT_OCR_LANGUAGES: &str = "eng+fra+spa+ara";

/// Page segmentation mode requested from the engine.
///
/// [`PageSegMode::AutoOsd`] (the default) lets the engine detect
/// orientation and layout itself instead of assuming a single text block —
/// scans arrive rotated often enough that this is the right default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSegMode {
    /// Automatic segmentation with orientation/script detection. (default)
    #[default]
    AutoOsd,
    /// Automatic segmentation, no orientation detection.
    Auto,
    /// Treat the image as a single uniform block of text.
    SingleBlock,
    /// Treat the image as a single text line.
    SingleLine,
}

/// Recognition engine mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineMode {
    /// Engine default: LSTM + legacy combined. (default)
    #[default]
    Default,
    /// Neural-net LSTM only.
    LstmOnly,
    /// Legacy engine only.
    LegacyOnly,
}

/// Everything an engine needs for one recognition call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrRequest {
    /// `+`-joined language codes, e.g. `"eng+fra+spa+ara"`.
    pub languages: String,
    pub page_seg_mode: PageSegMode,
    pub engine_mode: EngineMode,
}

impl Default for OcrRequest {
    fn default() -> Self {
        Self {
            languages: DEFAULT_OCR_LANGUAGES.to_string(),
            page_seg_mode: PageSegMode::default(),
            engine_mode: EngineMode::default(),
        }
    }
}

/// Failure reported by an engine implementation.
///
/// The pipeline maps this to [`crate::ExtractError::OcrEngine`]; engines do
/// not construct pipeline errors themselves.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Abstraction over an OCR backend.
///
/// Implementations accept binarized PNG bytes and return the recognized
/// text. `events` is a fire-and-forget observer: engines forward their
/// verbose progress notifications through
/// [`ExtractionProgressCallback::on_engine_event`] as they arrive, and the
/// sink has no influence on the returned result.
///
/// Implementations must be `Send + Sync`: the engine is shared as an
/// `Arc<dyn OcrEngine>` inside [`crate::ExtractionConfig`].
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(
        &self,
        image_png: &[u8],
        request: &OcrRequest,
        events: &dyn ExtractionProgressCallback,
    ) -> Result<String, EngineError>;
}

// ── Mock engine (always available, used for tests) ───────────────────────

/// Returns a pre-set string — lets the whole pipeline be exercised without
/// an OCR installation. Emits the same style of progress events a real
/// engine would, so observer wiring is testable too.
pub struct MockOcrEngine {
    text: String,
}

impl MockOcrEngine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn recognize(
        &self,
        _image_png: &[u8],
        request: &OcrRequest,
        events: &dyn ExtractionProgressCallback,
    ) -> Result<String, EngineError> {
        events.on_engine_event(&format!("loading language traineddata: {}", request.languages));
        events.on_engine_event("recognizing text");
        events.on_engine_event("recognizing text: done");
        Ok(self.text.clone())
    }
}

// ── Tesseract engine (optional, gated behind `tesseract` feature) ────────

#[cfg(feature = "tesseract")]
pub mod tesseract {
    //! Tesseract binding via leptess. Requires libtesseract + libleptonica
    //! on the system, plus traineddata for every requested language.

    use super::{EngineError, EngineMode, OcrEngine, OcrRequest, PageSegMode};
    use crate::progress::ExtractionProgressCallback;
    use async_trait::async_trait;
    use leptess::{LepTess, Variable};

    pub struct TesseractEngine {
        /// Override for the tessdata directory; `None` uses the system default.
        data_path: Option<String>,
    }

    impl TesseractEngine {
        pub fn new(data_path: Option<String>) -> Self {
            Self { data_path }
        }
    }

    fn psm_value(mode: PageSegMode) -> &'static str {
        match mode {
            PageSegMode::AutoOsd => "1",
            PageSegMode::Auto => "3",
            PageSegMode::SingleBlock => "6",
            PageSegMode::SingleLine => "7",
        }
    }

    #[async_trait]
    impl OcrEngine for TesseractEngine {
        async fn recognize(
            &self,
            image_png: &[u8],
            request: &OcrRequest,
            events: &dyn ExtractionProgressCallback,
        ) -> Result<String, EngineError> {
            events.on_engine_event("initializing api");

            // leptess exposes no engine-mode knob at init time; Tesseract's
            // own default (LSTM + legacy) matches EngineMode::Default. The
            // other modes would require a different binding.
            if request.engine_mode != EngineMode::Default {
                events.on_engine_event("engine mode override unsupported, using default");
            }

            let data_path = self.data_path.clone();
            let languages = request.languages.clone();
            let psm = psm_value(request.page_seg_mode);
            let image = image_png.to_vec();

            // leptess is a blocking C binding; keep it off the async workers.
            let text = tokio::task::spawn_blocking(move || -> Result<String, EngineError> {
                let mut lt = LepTess::new(data_path.as_deref(), &languages)
                    .map_err(|e| EngineError::new(e.to_string()))?;
                lt.set_variable(Variable::TesseditPagesegMode, psm)
                    .map_err(|e| EngineError::new(e.to_string()))?;
                lt.set_image_from_mem(&image)
                    .map_err(|e| EngineError::new(e.to_string()))?;
                lt.get_utf8_text().map_err(|e| EngineError::new(e.to_string()))
            })
            .await
            .map_err(|e| EngineError::new(format!("recognition task panicked: {e}")))??;

            events.on_engine_event("recognizing text: done");
            Ok(text)
        }
    }
}
