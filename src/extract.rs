//! Extraction entry points: dispatch, branch sequencing, failure
//! classification.
//!
//! [`extract`] is the primary API: inspect the declared media type, run the
//! matching branch to completion, return the normalized table. The pipeline
//! is strictly sequential per call — the async suspension points (blocking
//! stage offload, the OCR engine call) return control to the caller's
//! executor, but no two stages of the same extraction ever overlap.
//!
//! This module is also the single place where failure is classified. Branch
//! internals return kinds from the one [`ExtractError`] taxonomy and the
//! orchestrator propagates them unchanged; nothing escapes as a panic or a
//! foreign error type. All-or-nothing: an `Err` means no partial rows were
//! produced and the same input can simply be re-submitted.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::ExtractionResult;
use crate::pipeline::{binarize, lines, recognize, workbook};
use crate::source::{media_type_for_path, SourceFile, SourceFormat};
use std::path::Path;
use tracing::{debug, info};

/// Extract a normalized table from one source file.
///
/// # Arguments
/// * `file`   — bytes plus declared media type
/// * `config` — extraction configuration
///
/// # Errors
/// * [`ExtractError::UnsupportedFileType`] — media type matches no branch
/// * [`ExtractError::ImageDecode`] / [`ExtractError::EngineNotConfigured`] /
///   [`ExtractError::OcrEngine`] / [`ExtractError::OcrTimeout`] — image branch
/// * [`ExtractError::SpreadsheetParse`] — workbook branch
pub async fn extract(
    file: &SourceFile,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, ExtractError> {
    // ── Step 1: Dispatch ─────────────────────────────────────────────────
    let format =
        SourceFormat::detect(&file.media_type).ok_or_else(|| ExtractError::UnsupportedFileType {
            media_type: file.media_type.clone(),
        })?;
    info!(media_type = %file.media_type, %format, "starting extraction");

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(format);
    }

    // ── Step 2: Run the branch ───────────────────────────────────────────
    let result = match format {
        SourceFormat::Raster => extract_raster(file, config).await?,
        SourceFormat::Workbook => extract_workbook(file, config).await?,
    };

    info!(
        rows = result.rows.len(),
        columns = result.columns.len(),
        "extraction complete"
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(result.rows.len(), result.columns.len());
    }

    Ok(result)
}

/// Extract from a file on disk, inferring the media type from the extension.
///
/// # Errors
/// [`ExtractError::FileNotFound`] when the path cannot be read;
/// [`ExtractError::UnsupportedFileType`] when the extension maps to no
/// supported type (the guessed or literal extension string is carried for
/// diagnostics); otherwise as [`extract`].
pub async fn extract_path(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, ExtractError> {
    let path = path.as_ref();
    let media_type =
        media_type_for_path(path).ok_or_else(|| ExtractError::UnsupportedFileType {
            media_type: path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_else(|| "<no extension>".to_string()),
        })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| ExtractError::FileNotFound {
            path: path.to_path_buf(),
        })?;

    extract(&SourceFile::new(bytes, media_type), config).await
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    file: &SourceFile,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(file, config))
}

// ── Branches ─────────────────────────────────────────────────────────────

/// Image branch: binarize → OCR → line rows.
async fn extract_raster(
    file: &SourceFile,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, ExtractError> {
    let engine = config
        .engine
        .clone()
        .ok_or(ExtractError::EngineNotConfigured)?;

    // Decode + threshold are CPU-bound; keep them off the async workers.
    let bytes = file.bytes.clone();
    let binarized = tokio::task::spawn_blocking(move || binarize::binarize(&bytes))
        .await
        .map_err(|e| ExtractError::Internal(format!("binarization task panicked: {e}")))??;
    debug!(bytes = binarized.len(), "image binarized");

    let text = recognize::recognize(&engine, &binarized, config).await?;

    Ok(lines::tabulate(&text))
}

/// Workbook branch: parse sheets → accumulate rows/columns.
async fn extract_workbook(
    file: &SourceFile,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, ExtractError> {
    let bytes = file.bytes.clone();
    let sheets = tokio::task::spawn_blocking(move || workbook::parse(&bytes))
        .await
        .map_err(|e| ExtractError::Internal(format!("workbook task panicked: {e}")))??;
    debug!(sheets = sheets.len(), "workbook parsed");

    Ok(workbook::tabulate(&sheets, config))
}

// ── Single-slot handle ───────────────────────────────────────────────────

/// An extraction handle that admits at most one call at a time.
///
/// The free [`extract`] function is stateless and callers may run as many
/// concurrent extractions as they like. UI-style callers usually want the
/// opposite — one visible extraction slot whose busy state they can show —
/// and `Extractor` makes that explicit. The policy is REJECT: starting an
/// extraction while one is in flight fails fast with
/// [`ExtractError::ExtractionInFlight`] instead of queueing or cancelling
/// the running call.
///
/// # Example
/// ```rust,no_run
/// use file2table::{Extractor, ExtractionConfig, SourceFile};
///
/// # async fn demo(file: SourceFile) -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = Extractor::new(ExtractionConfig::default());
/// let table = extractor.try_extract(&file).await?;
/// println!("{} rows", table.rows.len());
/// # Ok(())
/// # }
/// ```
pub struct Extractor {
    config: ExtractionConfig,
    slot: tokio::sync::Mutex<()>,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            slot: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one extraction if the slot is free.
    ///
    /// # Errors
    /// [`ExtractError::ExtractionInFlight`] when a call is already running;
    /// otherwise as [`extract`].
    pub async fn try_extract(&self, file: &SourceFile) -> Result<ExtractionResult, ExtractError> {
        let _guard = self
            .slot
            .try_lock()
            .map_err(|_| ExtractError::ExtractionInFlight)?;
        extract(file, &self.config).await
    }

    /// Whether an extraction is currently running in this slot.
    pub fn is_busy(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }
}
