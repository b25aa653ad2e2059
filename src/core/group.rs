//! Unchecked cell collections

use super::cell::{Cell, CellPreview};

/// An ordered, unchecked collection of cells
///
/// Groups can overlap, leave gaps or sit anywhere on the grid; nothing is
/// validated until the group becomes a [`Table`](super::Table). This lets
/// sub-layouts be built in their own coordinates and then shifted into
/// place with [`add_offset`](CellGroup::add_offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGroup {
    pub cells: Vec<Cell>,
}

impl CellGroup {
    pub fn new(cells: Vec<Cell>) -> Self {
        CellGroup { cells }
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Number of rows covered: `max(row + row_span)`, or 0 when empty
    pub fn rows(&self) -> usize {
        self.cells.iter().map(Cell::row_end).max().unwrap_or(0)
    }

    /// Number of columns covered: `max(column + col_span)`, or 0 when empty
    pub fn columns(&self) -> usize {
        self.cells.iter().map(Cell::column_end).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Shift every cell by the given deltas
    ///
    /// Coordinates saturate; a cell pushed past `usize::MAX` fails the
    /// bounds check when the group becomes a table.
    pub fn add_offset(&mut self, row_delta: usize, column_delta: usize) {
        for cell in &mut self.cells {
            cell.row = cell.row.saturating_add(row_delta);
            cell.column = cell.column.saturating_add(column_delta);
        }
    }

    /// Builder form of [`add_offset`](CellGroup::add_offset)
    pub fn offset(mut self, row_delta: usize, column_delta: usize) -> Self {
        self.add_offset(row_delta, column_delta);
        self
    }

    /// Append the cells of another group
    pub fn merge(&mut self, other: CellGroup) {
        self.cells.extend(other.cells);
    }

    pub fn to_dict(&self) -> Vec<CellPreview> {
        self.cells.iter().map(Cell::to_dict).collect()
    }
}

impl From<Vec<Cell>> for CellGroup {
    fn from(cells: Vec<Cell>) -> Self {
        CellGroup { cells }
    }
}

impl Extend<Cell> for CellGroup {
    fn extend<T: IntoIterator<Item = Cell>>(&mut self, iter: T) {
        self.cells.extend(iter);
    }
}

impl FromIterator<Cell> for CellGroup {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        CellGroup {
            cells: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CellGroup {
    type Item = Cell;
    type IntoIter = std::vec::IntoIter<Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
