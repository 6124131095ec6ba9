//! Line tabulation: raw OCR text → the fixed two-column row set.
//!
//! Every line becomes a row, including leading, trailing and interior
//! blanks — no trimming, no de-duplication, no filtering. Consumers that
//! care about the literal line count (receipt line N, say) rely on that,
//! and it gives the stage a clean round-trip property: joining the row
//! texts with `\n` reconstructs the input exactly.

use crate::output::{CellValue, ColumnDef, ExtractionResult, Row};

/// Accessor of the line-number column (resolved from [`Row::id`]).
pub const LINE_NUMBER_ACCESSOR: &str = "id";
/// Accessor of the text column.
pub const TEXT_ACCESSOR: &str = "text";

/// Convert raw OCR text into rows, one per line.
pub fn tabulate(raw_text: &str) -> ExtractionResult {
    let columns = vec![
        ColumnDef::new("Line Number", LINE_NUMBER_ACCESSOR),
        ColumnDef::new("Text", TEXT_ACCESSOR),
    ];

    let rows = raw_text
        .split('\n')
        .enumerate()
        .map(|(id, line)| {
            let mut row = Row::new(id);
            row.cells
                .insert(TEXT_ACCESSOR.to_string(), CellValue::Text(line.to_string()));
            row
        })
        .collect();

    ExtractionResult { rows, columns }
}
