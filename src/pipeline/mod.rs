//! Pipeline stages for tabular extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different binarization strategy) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! Raster branch:    bytes ──▶ binarize ──▶ recognize ──▶ lines
//!                            (threshold)   (OCR engine)  (rows)
//!
//! Workbook branch:  bytes ──▶ workbook::parse ──▶ workbook::tabulate
//!                            (calamine)           (rows + columns)
//! ```
//!
//! 1. [`binarize`]  — decode, grayscale, hard-threshold, re-encode PNG;
//!    CPU-bound, runs under `spawn_blocking`
//! 2. [`recognize`] — drive the external OCR engine with deadline and
//!    progress forwarding; the only stage that awaits an external call
//! 3. [`lines`]     — raw OCR text to the fixed two-column row set
//! 4. [`workbook`]  — workbook bytes to one accumulated rows/columns set
//!    across all sheets

pub mod binarize;
pub mod lines;
pub mod recognize;
pub mod workbook;
