//! Free-form grid of rich-text cells

use serde::{Deserialize, Serialize};

use super::common::relative_widths;
use super::TableVariant;
use crate::core::{Cell, RenderOptions, Table};
use crate::docx::model::NativeTable;
use crate::docx::styles::text_width;
use crate::utils::error::TableResult;

fn one() -> usize {
    1
}

/// A cell as authored in the table editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericCell {
    #[serde(default)]
    pub header: bool,
    pub row: usize,
    pub column: usize,
    #[serde(default = "one")]
    pub row_span: usize,
    #[serde(default = "one")]
    pub col_span: usize,
    #[serde(default)]
    pub quill_text: String,
}

impl GenericCell {
    fn to_cell(&self) -> Cell {
        let mut cell = Cell::rich(self.row, self.column, self.quill_text.clone())
            .with_span(self.row_span, self.col_span);
        cell.header = self.header;
        cell
    }
}

/// A table whose every cell is authored by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericTable {
    pub rows: usize,
    pub columns: usize,
    /// Relative column weights; empty for equal widths
    #[serde(default)]
    pub column_widths: Vec<u32>,
    pub cells: Vec<GenericCell>,
}

impl TableVariant for GenericTable {
    fn build_default() -> Self {
        let header = |column: usize, label: &str| GenericCell {
            header: true,
            row: 0,
            column,
            row_span: 1,
            col_span: 1,
            quill_text: format!("<p>{}</p>", label),
        };
        let body = |column: usize| GenericCell {
            header: false,
            row: 1,
            column,
            row_span: 1,
            col_span: 1,
            quill_text: String::new(),
        };
        GenericTable {
            rows: 2,
            columns: 3,
            column_widths: Vec::new(),
            cells: vec![
                header(0, "Column A"),
                header(1, "Column B"),
                header(2, "Column C"),
                body(0),
                body(1),
                body(2),
            ],
        }
    }

    fn build_table(&self) -> TableResult<Table> {
        let cells = self
            .cells
            .iter()
            .map(|c| c.to_cell().checked())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table::with_extent(cells, self.rows, self.columns)?)
    }

    fn post_render(&self, native: &mut NativeTable, opts: &RenderOptions) {
        if self.column_widths.is_empty() {
            return;
        }
        if self.column_widths.len() != self.columns {
            log::warn!(
                "ignoring {} column widths for {} columns",
                self.column_widths.len(),
                self.columns
            );
            return;
        }
        let widths = relative_widths(&self.column_widths, text_width(opts.landscape));
        if !widths.is_empty() {
            native.column_widths = Some(widths);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{LayoutError, TableError};
    use pretty_assertions::assert_eq;

    fn cell(row: usize, column: usize, html: &str) -> GenericCell {
        GenericCell {
            header: false,
            row,
            column,
            row_span: 1,
            col_span: 1,
            quill_text: html.to_string(),
        }
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let table: GenericTable = serde_json::from_str(
            r#"{"rows": 1, "columns": 2, "cells": [
                {"row": 0, "column": 0, "col_span": 2, "quill_text": "<p>x</p>"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(table.cells[0].row_span, 1);
        assert_eq!(table.cells[0].col_span, 2);
        assert!(!table.cells[0].header);
        assert!(table.column_widths.is_empty());
    }

    #[test]
    fn test_two_by_two() {
        let table = GenericTable {
            rows: 2,
            columns: 2,
            column_widths: Vec::new(),
            cells: vec![
                cell(0, 0, "<p>A1</p>"),
                cell(0, 1, "<p>B1</p>"),
                cell(1, 0, "<p>A2</p>"),
                cell(1, 1, "<p>B2</p>"),
            ],
        };
        let doc = table.to_docx(None, &RenderOptions::default()).unwrap();
        let native = doc.tables().next().unwrap();
        assert_eq!((native.row_count(), native.columns), (2, 2));
        assert_eq!(native.cell(0, 1).unwrap().text(), "B1");
        assert_eq!(native.cell(1, 0).unwrap().text(), "A2");
    }

    #[test]
    fn test_declared_extent_enforced() {
        let table = GenericTable {
            rows: 1,
            columns: 1,
            column_widths: Vec::new(),
            cells: vec![cell(0, 0, "a"), cell(0, 1, "b")],
        };
        let err = table.build_table().unwrap_err();
        assert!(matches!(
            err.as_layout(),
            Some(LayoutError::OutOfBounds { row: 0, column: 1, .. })
        ));
    }

    #[test]
    fn test_far_row_is_out_of_bounds() {
        let table = GenericTable {
            rows: 2,
            columns: 2,
            column_widths: Vec::new(),
            cells: vec![cell(usize::MAX, 0, "a")],
        };
        assert!(matches!(
            table.build_table(),
            Err(TableError::Layout(LayoutError::OutOfBounds {
                row: usize::MAX,
                column: 0,
                ..
            }))
        ));
    }

    #[test]
    fn test_zero_span_rejected() {
        let mut bad = cell(0, 0, "a");
        bad.row_span = 0;
        let table = GenericTable {
            rows: 1,
            columns: 1,
            column_widths: Vec::new(),
            cells: vec![bad],
        };
        assert!(matches!(
            table.build_table(),
            Err(TableError::Layout(LayoutError::InvalidSpan { .. }))
        ));
    }

    #[test]
    fn test_header_shading_and_widths() {
        let mut table = GenericTable::build_default();
        table.column_widths = vec![2, 1, 1];
        let doc = table.to_docx(None, &RenderOptions::default()).unwrap();
        let native = doc.tables().next().unwrap();
        assert_eq!(native.cell(0, 0).unwrap().shade.as_deref(), Some("EEEEEE"));
        assert_eq!(native.cell(1, 0).unwrap().shade, None);
        assert_eq!(native.column_widths, Some(vec![4680, 2340, 2340]));
    }

    #[test]
    fn test_preview() {
        let preview = GenericTable::build_default().to_dict().unwrap();
        assert_eq!(preview.len(), 6);
        assert_eq!(preview[0].html, "<p>Column A</p>");
        assert!(preview[0].header);
        assert!(!preview[3].header);
    }
}
