//! Error handling for table layout and rendering
//!
//! This module provides the layout error taxonomy raised by [`Table`]
//! construction and a unified error type for everything built on top of it
//! (variant resolution, description loading, `.docx` packaging).
//!
//! [`Table`]: crate::core::Table

use std::fmt;

/// Compact description of the cell that triggered a layout failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell at ({}, {}) spanning {}x{}",
            self.row, self.column, self.row_span, self.col_span
        )
    }
}

/// Layout validation failure raised while finalizing a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A table needs at least one cell
    EmptyTable,
    /// Two cell footprints intersect at grid position `(row, column)`
    CellOverlap {
        row: usize,
        column: usize,
        cell: CellRef,
    },
    /// A cell footprint crosses the table rectangle at `(row, column)`
    OutOfBounds {
        row: usize,
        column: usize,
        cell: CellRef,
    },
    /// A span of zero rows or columns
    InvalidSpan { cell: CellRef },
    /// The grid would exceed the supported number of positions
    ExtentTooLarge { rows: usize, columns: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::EmptyTable => write!(f, "At least one cell is required"),
            LayoutError::CellOverlap { row, column, cell } => {
                write!(f, "Cell overlap at ({}, {}): {}", row, column, cell)
            }
            LayoutError::OutOfBounds { row, column, cell } => {
                write!(f, "Cell out of bounds at ({}, {}): {}", row, column, cell)
            }
            LayoutError::InvalidSpan { cell } => {
                write!(f, "Spans must be at least 1: {}", cell)
            }
            LayoutError::ExtentTooLarge { rows, columns } => {
                write!(f, "Table extent {}x{} is too large", rows, columns)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Table error type
#[derive(Debug, Clone)]
pub enum TableError {
    /// The cell grid could not be finalized
    Layout(LayoutError),
    /// The table description is malformed
    InvalidInput { message: String },
    /// Document packaging failed
    Serialization { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Layout(err) => write!(f, "Layout error: {}", err),
            TableError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            TableError::Serialization { message } => {
                write!(f, "Serialization error: {}", message)
            }
            TableError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for TableError {
    fn from(err: LayoutError) -> Self {
        TableError::Layout(err)
    }
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        TableError::InvalidInput {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for TableError {
    fn from(err: quick_xml::Error) -> Self {
        TableError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for TableError {
    fn from(err: zip::result::ZipError) -> Self {
        TableError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

// Convenience constructors for errors
impl TableError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TableError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        TableError::Serialization {
            message: message.into(),
        }
    }

    /// The layout failure behind this error, if any
    pub fn as_layout(&self) -> Option<&LayoutError> {
        match self {
            TableError::Layout(err) => Some(err),
            _ => None,
        }
    }
}
