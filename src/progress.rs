//! Progress-callback trait for extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline runs, including the OCR engine's own verbose
//! progress notifications forwarded verbatim.
//!
//! # Why callbacks instead of channels?
//!
//! The callback is a one-way notification path, fully independent of the
//! result future: callers can forward events to a progress bar, a log, or a
//! channel of their own without the library knowing how the host application
//! communicates. A sink that panics or blocks briefly cannot change the
//! success/failure outcome of the extraction it observes.
//!
//! # Example
//!
//! ```rust
//! use file2table::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::Arc;
//!
//! struct StderrEvents;
//!
//! impl ExtractionProgressCallback for StderrEvents {
//!     fn on_engine_event(&self, message: &str) {
//!         eprintln!("ocr: {message}");
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(StderrEvents))
//!     .build()
//!     .unwrap();
//! ```

use crate::source::SourceFormat;
use std::sync::Arc;

/// Called by the pipeline as one extraction proceeds.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; within one
/// extraction the calls arrive strictly sequentially.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after dispatch, before any branch work starts.
    fn on_extraction_start(&self, format: SourceFormat) {
        let _ = format;
    }

    /// A verbose progress notification from the OCR engine, forwarded
    /// unchanged. Only fires on the image branch, at whatever granularity
    /// the engine reports.
    fn on_engine_event(&self, message: &str) {
        let _ = message;
    }

    /// Called once when the extraction succeeds.
    fn on_extraction_complete(&self, rows: usize, columns: usize) {
        let _ = (rows, columns);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
