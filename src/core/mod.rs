//! Core layout engine
//!
//! This module contains the cell-grid layout types:
//! - `Cell`: a positioned, possibly spanning unit of content
//! - `CellGroup`: an unchecked, composable collection of cells
//! - `Table`: a validated grid in render order, rendered into a document
//! - `RenderOptions`: rendering configuration

pub mod cell;
pub mod group;
pub mod options;
pub mod table;

#[cfg(test)]
mod tests;

pub use cell::{Cell, CellContent, CellPreview, JudgementToken};
pub use group::CellGroup;
pub use options::{RenderOptions, DEFAULT_HEADER_SHADE};
pub use table::{new_document, Table};
