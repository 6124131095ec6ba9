//! Workbook tabulation: spreadsheet bytes → one accumulated row/column set.
//!
//! Parsing is delegated to calamine (xlsx / xlsm / xls / ods, autodetected
//! from the byte signature); this stage owns only the normalization rules:
//! which row is the header, how headers become columns, and how rows from
//! multiple sheets land in a single flat result.
//!
//! ## The accumulation rules
//!
//! Sheets are processed in declaration order into ONE shared rows/columns
//! set — sheets are not kept separate in the output. Each sheet's first row
//! is its header row; header text is used when present, otherwise a
//! `"Column {n}"` placeholder. Accessors are always the synthetic `colN`
//! with `N` continuing across sheets, so duplicate or blank headers can
//! never collide. Row ids restart at 0 per sheet by default — a documented
//! quirk, switchable with `per_sheet_ids(false)`.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{CellValue, ColumnDef, ExtractionResult, Row};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use tracing::debug;

/// One parsed sheet: its name and its rectangular cell range.
pub type SheetData = (String, Range<Data>);

/// Parse workbook bytes into sheets, in declaration order.
///
/// # Errors
/// [`ExtractError::SpreadsheetParse`] when the bytes are not a readable
/// workbook or a sheet cannot be loaded.
pub fn parse(workbook_bytes: &[u8]) -> Result<Vec<SheetData>, ExtractError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(workbook_bytes)).map_err(|e| {
        ExtractError::SpreadsheetParse {
            detail: e.to_string(),
        }
    })?;

    let names = workbook.sheet_names().to_owned();
    debug!(sheets = names.len(), "workbook opened");

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range =
            workbook
                .worksheet_range(&name)
                .map_err(|e| ExtractError::SpreadsheetParse {
                    detail: format!("sheet '{name}': {e}"),
                })?;
        sheets.push((name, range));
    }
    Ok(sheets)
}

/// Normalize parsed sheets into the shared row/column set.
///
/// An empty workbook (no sheets, or every sheet empty) yields an empty
/// result — a valid outcome, not a failure.
pub fn tabulate(sheets: &[SheetData], config: &ExtractionConfig) -> ExtractionResult {
    let mut columns: Vec<ColumnDef> = Vec::new();
    let mut rows: Vec<Row> = Vec::new();
    // Accessor numbering continues across sheets; row numbering depends on
    // `per_sheet_ids`.
    let mut column_base = 0usize;
    let mut global_row_id = 0usize;

    for (name, range) in sheets {
        let mut sheet_rows = range.rows();

        let Some(header) = sheet_rows.next() else {
            debug!(sheet = %name, "skipping empty sheet");
            continue;
        };

        for (position, cell) in header.iter().enumerate() {
            let text = header_text(cell);
            let header = if text.is_empty() {
                format!("Column {}", position + 1)
            } else {
                text
            };
            columns.push(ColumnDef::new(header, format!("col{}", column_base + position)));
        }

        let mut sheet_row_id = 0usize;
        for cells in sheet_rows {
            let id = if config.per_sheet_ids {
                sheet_row_id
            } else {
                global_row_id
            };
            let mut row = Row::new(id);
            for (position, cell) in cells.iter().enumerate() {
                if let Some(value) = cell_value(cell) {
                    row.cells
                        .insert(format!("col{}", column_base + position), value);
                }
            }
            rows.push(row);
            sheet_row_id += 1;
            global_row_id += 1;
        }

        debug!(sheet = %name, rows = sheet_row_id, columns = header.len(), "sheet tabulated");
        column_base += header.len();
    }

    ExtractionResult { rows, columns }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map a parsed cell to its output value. Empty cells map to `None` and are
/// omitted from the row entirely, keeping rows sparse.
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        // Serial date number; formatting is a presentation concern.
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => Some(CellValue::Text(s.clone())),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}
