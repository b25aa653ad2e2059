//! WASM bindings for hawc-tables
//!
//! This module provides JavaScript-accessible functions for previewing,
//! checking and rendering table descriptions in the browser.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::core::RenderOptions;
#[cfg(feature = "wasm")]
use crate::utils::diagnostics::{check_table, DiagnosticLevel};
#[cfg(feature = "wasm")]
use crate::variants::{TableDescription, TableKind};

/// Rendering options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize, Default)]
pub struct DocxRenderOptions {
    /// Base URL that relative hyperlinks resolve against
    #[serde(default)]
    pub base_url: Option<String>,
    /// Header cell fill, `#RRGGBB`
    #[serde(default)]
    pub header_shade: Option<String>,
    /// Force landscape pages
    #[serde(default)]
    pub landscape: bool,
    /// Heading placed above the table
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(feature = "wasm")]
impl DocxRenderOptions {
    fn into_render_options(self) -> RenderOptions {
        let mut opts = RenderOptions::default().with_landscape(self.landscape);
        if let Some(base_url) = self.base_url {
            opts = opts.with_base_url(base_url);
        }
        if self.header_shade.is_some() {
            opts = opts.with_header_shade(self.header_shade.as_deref());
        }
        if let Some(title) = self.title {
            opts = opts.with_title(title);
        }
        opts
    }
}

/// Summary of table check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}

#[cfg(feature = "wasm")]
fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Resolve a table description into its cell preview
///
/// # Arguments
/// * `input` - JSON table description tagged with `table_type`
///
/// # Returns
/// Array of `{row, column, row_span, col_span, html, header?, shade?}`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "renderPreview")]
pub fn render_preview(input: &str) -> Result<JsValue, JsValue> {
    let cells = TableDescription::from_json(input)
        .and_then(|d| d.to_dict())
        .map_err(js_error)?;
    serde_wasm_bindgen::to_value(&cells).map_err(js_error)
}

/// Render a table description to `.docx` bytes
///
/// # Arguments
/// * `input` - JSON table description
/// * `options` - Optional `DocxRenderOptions` object
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "renderDocx")]
pub fn render_docx(input: &str, options: JsValue) -> Result<Vec<u8>, JsValue> {
    let opts: DocxRenderOptions = if options.is_undefined() || options.is_null() {
        DocxRenderOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(js_error)?
    };
    crate::render_docx(input, &opts.into_render_options()).map_err(js_error)
}

/// Check a table description for layout and markup problems
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkTable")]
pub fn check_table_wasm(input: &str) -> Result<JsValue, JsValue> {
    let description = TableDescription::from_json(input).map_err(js_error)?;
    let result = check_table(&description);

    // Group diagnostics by level
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        let message = d.to_string();
        match d.level {
            DiagnosticLevel::Error => errors.push(message),
            DiagnosticLevel::Warning => warnings.push(message),
            DiagnosticLevel::Info => infos.push(message),
        }
    }

    let summary = CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).map_err(js_error)
}

/// Starter description for a table type, e.g. `"evidence_profile"`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "defaultTable")]
pub fn default_table(kind: &str) -> Result<String, JsValue> {
    let kind: TableKind = kind.parse().map_err(js_error)?;
    crate::default_description(kind).map_err(js_error)
}

/// List the supported table types
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "tableTypes")]
pub fn table_types() -> Vec<String> {
    TableKind::ALL.iter().map(|k| k.to_string()).collect()
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
