//! Table description diagnostics
//!
//! Rendering is permissive: unsupported markup is dropped and nothing is
//! rejected. This module is the opt-in strict pass. It reports what the
//! renderer would ignore, and layout errors, without changing the output.
//! It can identify:
//!
//! - Layout errors (overlapping or out-of-bounds cells, empty tables)
//! - Unsupported tags and attributes in rich text
//! - Links without a target
//! - Tables without any content
//!
//! ## Example
//!
//! ```rust
//! use hawc_tables::utils::diagnostics::check_html;
//!
//! let diagnostics = check_html("<p><blink>hi</blink></p>");
//! assert!(!diagnostics.is_empty());
//! ```

use std::fmt;

use fxhash::FxHashSet;
use html5ever::tokenizer::{TagKind, Token, TokenSink, TokenSinkResult};

use crate::core::{Cell, CellContent};
use crate::data::tags::{is_supported_attribute, is_supported_tag};
use crate::render::{attr, tokenize};
use crate::utils::error::{LayoutError, TableError};
use crate::variants::TableDescription;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output will differ from the authored markup
    Warning,
    /// Error - the table cannot be rendered
    Error,
}

impl DiagnosticLevel {
    fn ansi_color(self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "\x1b[31m",
            DiagnosticLevel::Warning => "\x1b[33m",
            DiagnosticLevel::Info => "\x1b[34m",
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Grid position `(row, column)` of the cell concerned
    pub cell: Option<(usize, usize)>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            cell: None,
            suggestion: None,
        }
    }

    pub fn at_cell(mut self, row: usize, column: usize) -> Self {
        self.cell = Some((row, column));
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;
        if let Some((row, column)) = self.cell {
            write!(f, "\n  --> cell ({}, {})", row, column)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Diagnostics collected for one table description
#[derive(Debug, Default)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    /// Number of diagnostics at `level`
    pub fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(DiagnosticLevel::Error) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// e.g. `"1 error, 2 warnings"`, or `"no issues found"`
    pub fn summary(&self) -> String {
        let parts: Vec<_> = [
            (DiagnosticLevel::Error, "error"),
            (DiagnosticLevel::Warning, "warning"),
            (DiagnosticLevel::Info, "note"),
        ]
        .into_iter()
        .filter_map(|(level, noun)| match self.count(level) {
            0 => None,
            1 => Some(format!("1 {}", noun)),
            n => Some(format!("{} {}s", n, noun)),
        })
        .collect();
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Check a table description for issues
pub fn check_table(description: &TableDescription) -> CheckResult {
    let mut result = CheckResult::new();

    let table = match description.build_table() {
        Ok(table) => table,
        Err(err) => {
            result.add(error_diagnostic(&err));
            return result;
        }
    };

    let mut blank = true;
    for cell in table.cells() {
        blank &= check_cell(cell, &mut result);
    }
    if blank {
        result.add(
            Diagnostic::new(DiagnosticLevel::Info, "table has no content")
                .with_suggestion("The rendered table will contain only empty cells"),
        );
    }

    result
}

fn error_diagnostic(err: &TableError) -> Diagnostic {
    let diag = Diagnostic::new(DiagnosticLevel::Error, err.to_string());
    match err.as_layout() {
        Some(LayoutError::CellOverlap { row, column, .. }) => diag
            .at_cell(*row, *column)
            .with_suggestion("Two cells claim this position; check their spans"),
        Some(LayoutError::OutOfBounds { row, column, .. }) => diag
            .at_cell(*row, *column)
            .with_suggestion("Reduce the span or enlarge the table"),
        Some(LayoutError::InvalidSpan { cell }) => diag.at_cell(cell.row, cell.column),
        Some(LayoutError::EmptyTable) => diag.with_suggestion("Add at least one cell"),
        Some(LayoutError::ExtentTooLarge { .. }) => {
            diag.with_suggestion("Check the declared rows and columns")
        }
        None => diag,
    }
}

/// Report markup issues of one cell; true when the cell has no text
fn check_cell(cell: &Cell, result: &mut CheckResult) -> bool {
    let (html, judged) = match cell.content {
        CellContent::RichText(ref html) => (html.as_str(), false),
        CellContent::Judgement(ref token) => (token.description.as_str(), true),
    };
    let scan = tokenize(html, MarkupScan::default());
    for diag in scan.diagnostics {
        result.add(diag.at_cell(cell.row, cell.column));
    }
    scan.blank && !judged
}

/// Check a rich-text fragment; each distinct issue is reported once
pub fn check_html(html: &str) -> Vec<Diagnostic> {
    tokenize(html, MarkupScan::default()).diagnostics
}

/// Token sink noting what the renderer would drop from a fragment
struct MarkupScan {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<String>,
    blank: bool,
}

impl Default for MarkupScan {
    fn default() -> Self {
        MarkupScan {
            diagnostics: Vec::new(),
            seen: FxHashSet::default(),
            blank: true,
        }
    }
}

impl MarkupScan {
    fn warn_once(&mut self, key: String, diag: Diagnostic) {
        if self.seen.insert(key) {
            self.diagnostics.push(diag);
        }
    }
}

impl TokenSink for MarkupScan {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(ref tag) if tag.kind == TagKind::StartTag => {
                let name = &*tag.name;
                if !is_supported_tag(name) {
                    self.warn_once(
                        format!("<{}>", name),
                        Diagnostic::new(
                            DiagnosticLevel::Warning,
                            format!("tag <{}> is not supported and will be ignored", name),
                        )
                        .with_suggestion("Its text is kept but its formatting is lost"),
                    );
                    return TokenSinkResult::Continue;
                }
                for attribute in &tag.attrs {
                    let key = &*attribute.name.local;
                    if !is_supported_attribute(name, key) {
                        self.warn_once(
                            format!("{}[{}]", name, key),
                            Diagnostic::new(
                                DiagnosticLevel::Warning,
                                format!("attribute '{}' on <{}> is ignored", key, name),
                            ),
                        );
                    }
                }
                if name == "a" && attr(tag, "href").map_or(true, |h| h.trim().is_empty()) {
                    self.diagnostics.push(
                        Diagnostic::new(DiagnosticLevel::Warning, "link without a target")
                            .with_suggestion("Add an href or remove the link"),
                    );
                }
            }
            Token::CharacterTokens(ref text) => {
                self.blank &= text.trim().is_empty();
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    const RESET: &str = "\x1b[0m";
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            output.push_str(&format!("{}{}{}\n\n", diag.level.ansi_color(), diag, RESET));
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    let summary = format!("Summary: {}", result.summary());
    if use_color {
        let color = match result.diagnostics.iter().map(|d| d.level).max() {
            Some(level) if level > DiagnosticLevel::Info => level.ansi_color(),
            _ => "\x1b[32m",
        };
        output.push_str(&format!("{}{}{}", color, summary, RESET));
    } else {
        output.push_str(&summary);
    }

    output
}
