//! Validated table layout and rendering

use super::cell::{Cell, CellPreview};
use super::group::CellGroup;
use super::options::RenderOptions;
use crate::docx::model::Document;
use crate::render::QuillParser;
use crate::utils::error::LayoutError;

/// Largest grid, in positions, a table may declare
pub const MAX_GRID_POSITIONS: usize = 1 << 20;

/// A validated cell grid in render order
///
/// Every grid position is covered by at most one cell and every cell lies
/// inside `[0, rows) x [0, columns)`. Cells are sorted row-major by their
/// top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    cells: Vec<Cell>,
    rows: usize,
    columns: usize,
    /// Column widths in twentieths of a point
    column_widths: Option<Vec<u32>>,
}

impl Table {
    /// Validate cells against the extent they cover
    pub fn new(cells: Vec<Cell>) -> Result<Self, LayoutError> {
        let group = CellGroup::new(cells);
        let (rows, columns) = (group.rows(), group.columns());
        Self::with_extent(group.cells, rows, columns)
    }

    /// Validate cells against a declared extent; gaps are allowed
    pub fn with_extent(
        mut cells: Vec<Cell>,
        rows: usize,
        columns: usize,
    ) -> Result<Self, LayoutError> {
        validate(&cells, rows, columns)?;
        // stable: cells sharing a corner keep their input order
        cells.sort_by_key(|cell| cell.row_order_index(columns));
        log::debug!(
            "table layout: {} cells on a {}x{} grid",
            cells.len(),
            rows,
            columns
        );
        Ok(Table {
            cells,
            rows,
            columns,
            column_widths: None,
        })
    }

    /// Fixed column widths in twentieths of a point
    pub fn with_column_widths(mut self, widths: Vec<u32>) -> Self {
        if widths.len() == self.columns {
            self.column_widths = Some(widths);
        } else {
            log::warn!(
                "ignoring {} column widths for a table of {} columns",
                widths.len(),
                self.columns
            );
        }
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn column_widths(&self) -> Option<&[u32]> {
        self.column_widths.as_deref()
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn to_dict(&self) -> Vec<CellPreview> {
        self.cells.iter().map(Cell::to_dict).collect()
    }

    /// Append the table to `doc` and return its position in the body
    pub fn render_into(&self, doc: &mut Document, opts: &RenderOptions) -> usize {
        let header_fill = opts.header_fill();
        let mut parser = QuillParser::new(opts.base_url.as_deref());

        let (body, rels) = doc.split_mut();
        let index = body.items.len();
        let native = body.add_table(self.rows, self.columns);
        native.style = opts.table_style.clone();
        native.column_widths = self.column_widths.clone();

        for cell in &self.cells {
            let last = (cell.row_end() - 1, cell.column_end() - 1);
            let Some(target) = native.merge((cell.row, cell.column), last) else {
                log::warn!("could not merge {}", cell.to_ref());
                continue;
            };
            target.strip_default_paragraph();
            cell.to_docx(target, &mut parser, rels, header_fill.as_deref());
        }

        if opts.landscape {
            doc.landscape = true;
        }
        index
    }

    /// Render into `doc`, or into a new document when `None`
    pub fn to_docx(&self, doc: Option<Document>, opts: &RenderOptions) -> Document {
        let mut doc = doc.unwrap_or_else(|| new_document(opts));
        self.render_into(&mut doc, opts);
        doc
    }
}

impl TryFrom<CellGroup> for Table {
    type Error = LayoutError;

    fn try_from(group: CellGroup) -> Result<Self, Self::Error> {
        Table::new(group.cells)
    }
}

/// A fresh document carrying the title from `opts`
pub fn new_document(opts: &RenderOptions) -> Document {
    Document {
        title: opts.title.clone(),
        landscape: opts.landscape,
        ..Document::default()
    }
}

/// Check spans, bounds and overlap with an occupancy grid
fn validate(cells: &[Cell], rows: usize, columns: usize) -> Result<(), LayoutError> {
    if cells.is_empty() {
        return Err(LayoutError::EmptyTable);
    }
    let area = rows
        .checked_mul(columns)
        .filter(|&area| area <= MAX_GRID_POSITIONS)
        .ok_or(LayoutError::ExtentTooLarge { rows, columns })?;

    let mut occupied = vec![false; area];
    for cell in cells {
        if cell.row_span == 0 || cell.col_span == 0 {
            return Err(LayoutError::InvalidSpan {
                cell: cell.to_ref(),
            });
        }
        if let Some((row, column)) = first_outside(cell, rows, columns) {
            return Err(LayoutError::OutOfBounds {
                row,
                column,
                cell: cell.to_ref(),
            });
        }
        for (row, column) in cell.footprint() {
            let slot = &mut occupied[row * columns + column];
            if *slot {
                return Err(LayoutError::CellOverlap {
                    row,
                    column,
                    cell: cell.to_ref(),
                });
            }
            *slot = true;
        }
    }
    Ok(())
}

/// First footprint position, in row-major order, outside the grid
fn first_outside(cell: &Cell, rows: usize, columns: usize) -> Option<(usize, usize)> {
    if cell.row >= rows || cell.column >= columns {
        Some((cell.row, cell.column))
    } else if cell.column_end() > columns {
        Some((cell.row, columns))
    } else if cell.row_end() > rows {
        Some((rows, cell.column))
    } else {
        None
    }
}
