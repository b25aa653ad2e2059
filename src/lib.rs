//! # hawc-tables
//!
//! Report tables for HAWC assessments: a cell-grid layout engine and a
//! Quill rich-text to `.docx` renderer.
//!
//! ## Features
//!
//! - **Layout engine**: positioned, spanning cells composed into groups and
//!   validated into a grid with no overlaps or gaps outside the extent
//! - **Rich text**: the Quill HTML subset (paragraphs, headings, lists,
//!   emphasis, hyperlinks) rendered into native Word paragraphs and runs
//! - **Table variants**: generic, evidence integration, evidence profile,
//!   study evaluation and study outcome descriptions
//! - **Diagnostics**: layout and markup checks before rendering
//! - **WASM Support**: Compiles to WebAssembly for browser previews
//!
//! ## Usage Examples
//!
//! ### Laying out cells
//!
//! ```rust
//! use hawc_tables::{Cell, CellGroup, Table};
//!
//! let mut group = CellGroup::default();
//! group.push(Cell::header_text(0, 0, "Study").with_span(1, 2));
//! group.push(Cell::text(1, 0, "Smith 2020"));
//! group.push(Cell::rich(1, 1, "<p><em>in vivo</em></p>"));
//!
//! let table = Table::try_from(group).unwrap();
//! assert_eq!((table.rows(), table.columns()), (2, 2));
//! ```
//!
//! ### Rendering a table description
//!
//! ```rust
//! use hawc_tables::{RenderOptions, TableDescription, TableKind};
//!
//! let description = TableDescription::build_default(TableKind::Generic);
//! let bytes = description.to_docx_bytes(&RenderOptions::default()).unwrap();
//! assert_eq!(&bytes[..2], b"PK");
//! ```

/// Cell grid layout and table rendering
pub mod core;

/// Data layer - tag and judgement vocabularies
pub mod data;

/// Native document model and `.docx` packaging
pub mod docx;

/// Rich-text (Quill HTML) renderer
pub mod render;

/// Utility modules
pub mod utils;

/// Table variants built on the layout engine
pub mod variants;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export the layout engine
pub use core::{
    new_document, Cell, CellContent, CellGroup, CellPreview, JudgementToken, RenderOptions, Table,
    DEFAULT_HEADER_SHADE,
};

// Re-export the renderer
pub use docx::{write_docx, Document};
pub use render::QuillParser;

// Re-export variants
pub use variants::{
    EvidenceIntegrationTable, EvidenceProfileTable, GenericTable, StudyEvaluationTable,
    StudyOutcomeTable, TableDescription, TableKind, TableVariant,
};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{CellRef, LayoutError, TableError, TableResult};

/// Render a JSON table description to `.docx` bytes
///
/// # Arguments
/// * `input` - JSON object tagged with `table_type`
/// * `options` - Rendering options
pub fn render_docx(input: &str, options: &RenderOptions) -> TableResult<Vec<u8>> {
    let description = TableDescription::from_json(input)?;
    log::debug!("rendering {} table", description.kind());
    description.to_docx_bytes(options)
}

/// Resolve a JSON table description into its cell preview, as JSON
///
/// The preview lists every cell in render order with its position, spans and
/// HTML, which is what the browser editor draws.
pub fn preview(input: &str) -> TableResult<String> {
    let cells = TableDescription::from_json(input)?.to_dict()?;
    serde_json::to_string(&cells).map_err(|e| TableError::serialization(e.to_string()))
}

/// Default description of a table kind, as pretty JSON
pub fn default_description(kind: TableKind) -> TableResult<String> {
    TableDescription::build_default(kind).to_json()
}
