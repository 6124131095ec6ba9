//! Configuration types for tabular extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across calls, log it, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; the positional-argument alternative breaks on every new field.

use crate::engine::{EngineMode, OcrEngine, PageSegMode, DEFAULT_OCR_LANGUAGES};
use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for one or more extraction calls.
///
/// Built via [`ExtractionConfig::builder()`] or
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use file2table::{ExtractionConfig, MockOcrEngine};
/// use std::sync::Arc;
///
/// let config = ExtractionConfig::builder()
///     .engine(Arc::new(MockOcrEngine::new("line one\nline two")))
///     .ocr_timeout_secs(120)
///     .per_sheet_ids(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// The OCR engine used by the image branch. `None` is valid as long as
    /// only workbooks are extracted; an image input without an engine fails
    /// with [`ExtractError::EngineNotConfigured`].
    pub engine: Option<Arc<dyn OcrEngine>>,

    /// `+`-joined language codes passed to the engine.
    /// Default: `"eng+fra+spa+ara"` — all four models simultaneously active.
    pub ocr_languages: String,

    /// Page segmentation mode. Default: [`PageSegMode::AutoOsd`] — the
    /// engine detects orientation and layout rather than assuming a single
    /// text block.
    pub page_seg_mode: PageSegMode,

    /// Recognition engine mode. Default: [`EngineMode::Default`]
    /// (LSTM + legacy combined, per engine defaults).
    pub engine_mode: EngineMode,

    /// Deadline for one OCR call. Default: 60 s.
    ///
    /// `None` disables the deadline entirely: a hang in the external engine
    /// then blocks the extraction indefinitely, which is the historical
    /// behaviour some callers rely on. On expiry the call surfaces
    /// [`ExtractError::OcrTimeout`], distinct from engine failure.
    pub ocr_timeout: Option<Duration>,

    /// Restart row ids at 0 for each sheet of a workbook. Default: `true`.
    ///
    /// The default preserves the documented quirk that `id` is NOT globally
    /// unique across sheets. Set to `false` to number rows 0..n across the
    /// whole result instead.
    pub per_sheet_ids: bool,

    /// Observer for progress events, including forwarded OCR engine
    /// notifications. Default: none (no-op).
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            engine: None,
            ocr_languages: DEFAULT_OCR_LANGUAGES.to_string(),
            page_seg_mode: PageSegMode::default(),
            engine_mode: EngineMode::default(),
            ocr_timeout: Some(Duration::from_secs(60)),
            per_sheet_ids: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("engine", &self.engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("ocr_languages", &self.ocr_languages)
            .field("page_seg_mode", &self.page_seg_mode)
            .field("engine_mode", &self.engine_mode)
            .field("ocr_timeout", &self.ocr_timeout)
            .field("per_sheet_ids", &self.per_sheet_ids)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn ocr_languages(mut self, languages: impl Into<String>) -> Self {
        self.config.ocr_languages = languages.into();
        self
    }

    pub fn page_seg_mode(mut self, mode: PageSegMode) -> Self {
        self.config.page_seg_mode = mode;
        self
    }

    pub fn engine_mode(mut self, mode: EngineMode) -> Self {
        self.config.engine_mode = mode;
        self
    }

    pub fn ocr_timeout(mut self, timeout: Duration) -> Self {
        self.config.ocr_timeout = Some(timeout);
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Remove the OCR deadline: wait on the engine indefinitely.
    pub fn no_ocr_timeout(mut self) -> Self {
        self.config.ocr_timeout = None;
        self
    }

    pub fn per_sheet_ids(mut self, v: bool) -> Self {
        self.config.per_sheet_ids = v;
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.ocr_languages.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "ocr_languages must not be empty".into(),
            ));
        }
        if c.ocr_timeout == Some(Duration::ZERO) {
            return Err(ExtractError::InvalidConfig(
                "ocr_timeout must be > 0 (use no_ocr_timeout() to disable)".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_contract() {
        let c = ExtractionConfig::default();
        assert_eq!(c.ocr_languages, "eng+fra+spa+ara");
        assert_eq!(c.ocr_timeout, Some(Duration::from_secs(60)));
        assert!(c.per_sheet_ids);
        assert!(c.engine.is_none());
    }

    #[test]
    fn build_rejects_empty_languages() {
        let err = ExtractionConfig::builder()
            .ocr_languages("   ")
            .build()
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn build_rejects_zero_timeout() {
        let err = ExtractionConfig::builder()
            .ocr_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn no_ocr_timeout_clears_deadline() {
        let c = ExtractionConfig::builder()
            .no_ocr_timeout()
            .build()
            .unwrap();
        assert_eq!(c.ocr_timeout, None);
    }

    #[test]
    fn debug_elides_trait_objects() {
        use crate::engine::MockOcrEngine;
        let c = ExtractionConfig::builder()
            .engine(Arc::new(MockOcrEngine::new("x")))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn OcrEngine>"));
        assert!(!dbg.contains("MockOcrEngine"));
    }
}
