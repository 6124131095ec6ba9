//! Error types for the file2table library.
//!
//! One closed taxonomy covers every way an extraction can fail. All variants
//! are user-facing and recoverable: a failed call leaves no side effects and
//! is safe to re-invoke with the same or a different file. The library never
//! retries internally — whether to re-run after an [`ExtractError::OcrEngine`]
//! or [`ExtractError::OcrTimeout`] is the caller's decision.
//!
//! There is deliberately no "partial result" carrier: extraction is
//! all-or-nothing per call, so an `Err` means no rows and no columns were
//! produced.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the file2table library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Dispatch errors ───────────────────────────────────────────────────
    /// The declared media type matches neither the image nor the workbook
    /// branch. Carries the original string for diagnostics.
    #[error("Unsupported file type '{media_type}'\nSupported: image/* or a spreadsheet media type (xlsx, xls, ods).")]
    UnsupportedFileType { media_type: String },

    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    // ── Image branch errors ───────────────────────────────────────────────
    /// The image bytes could not be decoded into a bitmap.
    #[error("Failed to decode image: {detail}\nThe file may be corrupt or in an unsupported raster format.")]
    ImageDecode { detail: String },

    /// No OCR engine was configured but the input dispatched to the image
    /// branch.
    #[error("No OCR engine is configured.\nInject one with ExtractionConfig::builder().engine(...) — see MockOcrEngine, or build with --features tesseract.")]
    EngineNotConfigured,

    /// The external OCR engine reported a failure.
    #[error("OCR engine error: {detail}")]
    OcrEngine { detail: String },

    /// The OCR call exceeded the configured deadline.
    ///
    /// Distinct from [`ExtractError::OcrEngine`]: the engine did not fail,
    /// it just did not answer in time. The caller may retry with a longer
    /// `ocr_timeout` or disable the deadline entirely.
    #[error("OCR call timed out after {elapsed_ms}ms\nIncrease ocr_timeout or pass None to wait indefinitely.")]
    OcrTimeout { elapsed_ms: u64 },

    // ── Workbook branch errors ────────────────────────────────────────────
    /// The workbook bytes could not be parsed.
    #[error("Failed to parse spreadsheet: {detail}\nThe file may be corrupt or not an xlsx/xls/ods workbook.")]
    SpreadsheetParse { detail: String },

    // ── Orchestration errors ──────────────────────────────────────────────
    /// An [`crate::Extractor`] call was rejected because another extraction
    /// is already running in its slot.
    #[error("An extraction is already in flight on this Extractor\nWait for it to finish, or use the free `extract` function for independent calls.")]
    ExtractionInFlight,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
