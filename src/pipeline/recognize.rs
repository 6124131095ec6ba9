//! OCR invocation: drive the external engine on a binarized image.
//!
//! This stage is intentionally thin — all recognition behaviour belongs to
//! the engine behind [`OcrEngine`]; the stage only builds the request from
//! config, enforces the deadline, forwards progress events, and maps the
//! engine's outcome into the pipeline's error taxonomy.
//!
//! ## Deadline
//!
//! The engine call is wrapped in `tokio::time::timeout` when a deadline is
//! configured. The engine future is simply dropped on expiry — there is no
//! cooperative cancellation protocol with the engine, so a blocking engine
//! implementation must do its own work on a blocking thread (see
//! `TesseractEngine`). Expiry surfaces [`ExtractError::OcrTimeout`],
//! deliberately distinct from [`ExtractError::OcrEngine`]: "the engine said
//! no" and "the engine said nothing" call for different caller reactions.

use crate::config::ExtractionConfig;
use crate::engine::{OcrEngine, OcrRequest};
use crate::error::ExtractError;
use crate::progress::{ExtractionProgressCallback, NoopProgressCallback};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

static NOOP: NoopProgressCallback = NoopProgressCallback;

/// Recognize text on a binarized PNG via the configured engine.
///
/// No retry: a failed call leaves no side effects and the caller may simply
/// re-invoke with the same bytes.
pub async fn recognize(
    engine: &Arc<dyn OcrEngine>,
    image_png: &[u8],
    config: &ExtractionConfig,
) -> Result<String, ExtractError> {
    let request = OcrRequest {
        languages: config.ocr_languages.clone(),
        page_seg_mode: config.page_seg_mode,
        engine_mode: config.engine_mode,
    };

    let events: &dyn ExtractionProgressCallback = config
        .progress_callback
        .as_deref()
        .unwrap_or(&NOOP);

    let start = Instant::now();
    debug!(languages = %request.languages, "starting OCR recognition");

    let outcome = match config.ocr_timeout {
        Some(deadline) => {
            match tokio::time::timeout(deadline, engine.recognize(image_png, &request, events))
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    warn!(elapsed_ms, "OCR call exceeded its deadline");
                    return Err(ExtractError::OcrTimeout { elapsed_ms });
                }
            }
        }
        None => engine.recognize(image_png, &request, events).await,
    };

    match outcome {
        Ok(text) => {
            debug!(
                chars = text.chars().count(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "OCR recognition complete"
            );
            Ok(text)
        }
        Err(e) => {
            warn!(error = %e, "OCR engine reported failure");
            Err(ExtractError::OcrEngine {
                detail: e.to_string(),
            })
        }
    }
}
