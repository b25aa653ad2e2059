//! Python bindings for hawc-tables

use hawc_tables::diagnostics::check_table;
use hawc_tables::{RenderOptions, TableDescription, TableKind};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Render a JSON table description to `.docx` bytes
#[pyfunction]
#[pyo3(signature = (spec, base_url=None, header_shade=None, landscape=false))]
fn render_docx<'py>(
    py: Python<'py>,
    spec: &str,
    base_url: Option<String>,
    header_shade: Option<String>,
    landscape: bool,
) -> PyResult<Bound<'py, PyBytes>> {
    let mut opts = RenderOptions::default().with_landscape(landscape);
    if let Some(base_url) = base_url {
        opts = opts.with_base_url(base_url);
    }
    if header_shade.is_some() {
        opts = opts.with_header_shade(header_shade.as_deref());
    }
    let bytes = hawc_tables::render_docx(spec, &opts).map_err(value_error)?;
    Ok(PyBytes::new(py, &bytes))
}

/// Resolved cells of a JSON table description, as JSON
#[pyfunction]
fn preview(spec: &str) -> PyResult<String> {
    hawc_tables::preview(spec).map_err(value_error)
}

/// Diagnostics for a JSON table description, one line each
#[pyfunction]
fn check(spec: &str) -> PyResult<Vec<String>> {
    let description = TableDescription::from_json(spec).map_err(value_error)?;
    Ok(check_table(&description)
        .diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect())
}

/// Starter description for a table type
#[pyfunction]
fn default_table(kind: &str) -> PyResult<String> {
    let kind: TableKind = kind.parse().map_err(value_error)?;
    hawc_tables::default_description(kind).map_err(value_error)
}

#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(render_docx, m)?)?;
    m.add_function(wrap_pyfunction!(preview, m)?)?;
    m.add_function(wrap_pyfunction!(check, m)?)?;
    m.add_function(wrap_pyfunction!(default_table, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
