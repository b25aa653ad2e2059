//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics and error reporting
//! - Error types and result types
//! - Shade color helpers
//! - Markup escaping for previews

pub mod color;
pub mod diagnostics;
pub mod error;
pub mod markup;

// Re-export commonly used items
pub use diagnostics::{
    check_html, check_table, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel,
};
pub use error::{CellRef, LayoutError, TableError, TableResult};
