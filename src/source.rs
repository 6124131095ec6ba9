//! Input model: the uploaded file and its format dispatch.
//!
//! ## Why a closed enum instead of string checks?
//!
//! Dispatch used to be a chain of ad hoc substring probes against the
//! declared MIME string. [`SourceFormat`] makes the supported set a closed
//! enumeration: every call site that branches on format is forced through an
//! exhaustive `match`, and "unsupported" is a value
//! ([`SourceFormat::detect`] returning `None`) rather than a fall-through.
//! The detection rules themselves are unchanged — `image/` prefix first,
//! then the spreadsheet marker substrings, case-sensitive, first match wins.

use std::path::Path;

/// Marker substrings that identify a spreadsheet media type.
///
/// Covers `application/vnd.ms-excel`,
/// `application/vnd.openxmlformats-officedocument.spreadsheetml.sheet`, and
/// the OpenDocument `…opendocument.spreadsheet` family. Matching is
/// case-sensitive against the declared type as-is.
const WORKBOOK_MARKERS: [&str; 3] = ["sheet", "excel", "spreadsheetml"];

/// One user-supplied input: raw bytes plus the declared media type.
///
/// Immutable once constructed; consumed (read, never mutated) by each
/// extraction attempt. The pipeline only reads `media_type` for dispatch and
/// `bytes` for decoding.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// The format this file dispatches to, if any.
    pub fn format(&self) -> Option<SourceFormat> {
        SourceFormat::detect(&self.media_type)
    }
}

/// The two mutually exclusive extraction branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Raster image: binarize → OCR → line rows.
    Raster,
    /// Spreadsheet workbook: parse → per-sheet tabulation.
    Workbook,
}

impl SourceFormat {
    /// Detect the branch for a declared media type.
    ///
    /// Checked in order, first match wins:
    /// 1. type starts with `image/` → [`SourceFormat::Raster`]
    /// 2. type contains `sheet`, `excel`, or `spreadsheetml` →
    ///    [`SourceFormat::Workbook`]
    /// 3. otherwise `None` (the orchestrator maps this to
    ///    [`crate::ExtractError::UnsupportedFileType`]).
    pub fn detect(media_type: &str) -> Option<SourceFormat> {
        if media_type.starts_with("image/") {
            return Some(SourceFormat::Raster);
        }
        if WORKBOOK_MARKERS.iter().any(|m| media_type.contains(m)) {
            return Some(SourceFormat::Workbook);
        }
        None
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Raster => f.write_str("raster image"),
            SourceFormat::Workbook => f.write_str("spreadsheet workbook"),
        }
    }
}

/// Guess a media type from a file extension.
///
/// Used by [`crate::extract_path`] when reading from disk, where no declared
/// MIME type exists. The mapping mirrors the extensions a file picker for
/// this pipeline would accept. Returns `None` for unknown extensions.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsm" => "application/vnd.ms-excel.sheet.macroEnabled.12",
        "xls" => "application/vnd.ms-excel",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        // text/csv matches neither branch marker; dispatch rejects it.
        "csv" => "text/csv",
        _ => return None,
    };
    Some(media_type)
}
