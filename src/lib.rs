//! # file2table
//!
//! Extract a normalized table from a single file — a raster image (via OCR)
//! or a spreadsheet workbook — ready for any generic table widget.
//!
//! ## Why this crate?
//!
//! "Get the data out of whatever the user uploaded" usually means two very
//! different code paths with two very different output shapes. This crate
//! collapses both into one contract: a set of named columns with synthetic,
//! collision-free accessors, and an ordered sequence of rows. Scanned
//! receipts and multi-sheet budget workbooks come out the same shape.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file (bytes + media type)
//!  │
//!  ├─ Dispatch   closed SourceFormat enum: image/* vs spreadsheet types
//!  │
//!  ├─ Raster     decode → grayscale → hard threshold → PNG
//!  │             → OCR engine (eng+fra+spa+ara, auto layout)
//!  │             → one row per text line
//!  │
//!  └─ Workbook   calamine parse → per-sheet header inference
//!                → one accumulated rows/columns set
//!
//! both branches → ExtractionResult { rows, columns }
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use file2table::{extract, ExtractionConfig, MockOcrEngine, SourceFile};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("receipt.png")?;
//!     let file = SourceFile::new(bytes, "image/png");
//!
//!     let config = ExtractionConfig::builder()
//!         .engine(Arc::new(MockOcrEngine::new("Total 12.50")))
//!         .build()?;
//!
//!     let table = extract(&file, &config).await?;
//!     for row in &table.rows {
//!         println!("{row:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! With the `tesseract` feature enabled, swap the mock for
//! `engine::tesseract::TesseractEngine` to recognize real scans.
//!
//! ## Feature Flags
//!
//! | Feature     | Default | Description |
//! |-------------|---------|-------------|
//! | `cli`       | on      | Enables the `file2table` binary (clap + anyhow + indicatif + tracing-subscriber) |
//! | `tesseract` | off     | Binds the system Tesseract installation as a real OCR engine (leptess) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! file2table = { version = "0.3", default-features = false }
//! ```
//!
//! ## Guarantees
//!
//! * All-or-nothing: a failed extraction returns no partial rows and is
//!   side-effect free — re-invoking with the same file is always safe.
//! * Accessors are unique within one result, even with duplicate or blank
//!   headers across sheets.
//! * Binarized pixels are pure black/white (every colour channel exactly 0
//!   or 255, alpha untouched); the threshold is a fixed, strict `> 128`.
//! * Row `id` restarts per sheet by default — see
//!   [`ExtractionConfigBuilder::per_sheet_ids`] for the global alternative.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use engine::{
    EngineError, EngineMode, MockOcrEngine, OcrEngine, OcrRequest, PageSegMode,
    DEFAULT_OCR_LANGUAGES,
};
pub use error::ExtractError;
pub use extract::{extract, extract_path, extract_sync, Extractor};
pub use output::{CellValue, ColumnDef, ExtractionResult, Row};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use source::{SourceFile, SourceFormat};
