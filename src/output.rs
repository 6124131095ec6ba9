//! Output contract: the normalized table both extraction branches produce.
//!
//! [`ExtractionResult`] is the sole type handed to consumers. Columns and
//! rows are produced together and stay mutually consistent — every accessor
//! referenced by a row appears in `columns`. Accessors are synthetic keys
//! (`col0`, `col1`, … for workbooks; `id`/`text` for OCR output) so that
//! duplicate or empty human-readable headers never collide.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named column of the result.
///
/// `header` is display text; `accessor` is the stable lookup key into
/// [`Row`] cells. Accessors are unique within one result and independent of
/// header text, so two sheets with identical headers still yield distinct
/// columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub accessor: String,
}

impl ColumnDef {
    pub fn new(header: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor: accessor.into(),
        }
    }
}

/// A single cell value.
///
/// Workbook cells keep their parsed type; OCR lines are always text. An
/// absent entry in [`Row::cells`] means the cell was empty — empty cells are
/// not materialised, so rows stay sparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One row of the result.
///
/// `id` is the zero-based sequence number of the row. It is unique and
/// ordering-stable within a single-sheet result; with the default
/// per-sheet numbering a multi-sheet workbook restarts `id` at 0 for each
/// sheet, so it is NOT a global key (see
/// [`crate::ExtractionConfigBuilder::per_sheet_ids`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: usize,
    #[serde(flatten)]
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    /// Look up a cell by column accessor.
    ///
    /// The reserved accessor `"id"` resolves to the row id itself (the OCR
    /// branch exposes the line number as a column this way).
    pub fn get(&self, accessor: &str) -> Option<CellValue> {
        if accessor == "id" {
            return Some(CellValue::Number(self.id as f64));
        }
        self.cells.get(accessor).cloned()
    }
}

/// The normalized table returned by every successful extraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnDef>,
}

impl ExtractionResult {
    /// True when the extraction produced neither rows nor columns
    /// (e.g. an empty workbook — a valid result, not a failure).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check the rows/columns consistency invariant: every accessor
    /// referenced by any row (other than the reserved `id`) appears in
    /// `columns`.
    pub fn is_consistent(&self) -> bool {
        let known: std::collections::BTreeSet<&str> =
            self.columns.iter().map(|c| c.accessor.as_str()).collect();
        self.rows
            .iter()
            .flat_map(|r| r.cells.keys())
            .all(|a| a == "id" || known.contains(a.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_get_resolves_id_and_cells() {
        let mut row = Row::new(7);
        row.cells.insert("col0".into(), "Ann".into());

        assert_eq!(row.get("id"), Some(CellValue::Number(7.0)));
        assert_eq!(row.get("col0"), Some(CellValue::Text("Ann".into())));
        assert_eq!(row.get("col1"), None);
    }

    #[test]
    fn consistency_check_flags_orphan_accessor() {
        let mut row = Row::new(0);
        row.cells.insert("col3".into(), CellValue::Number(1.0));

        let result = ExtractionResult {
            rows: vec![row],
            columns: vec![ColumnDef::new("Name", "col0")],
        };
        assert!(!result.is_consistent());
    }

    #[test]
    fn empty_result_is_consistent() {
        let result = ExtractionResult::default();
        assert!(result.is_empty());
        assert!(result.is_consistent());
    }

    #[test]
    fn cell_value_serializes_untagged() {
        let row = Row {
            id: 0,
            cells: BTreeMap::from([
                ("col0".to_string(), CellValue::Text("Ann".into())),
                ("col1".to_string(), CellValue::Number(5.0)),
            ]),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], 0);
        assert_eq!(json["col0"], "Ann");
        assert_eq!(json["col1"], 5.0);
    }
}
