//! Positioned table cells

use serde::{Deserialize, Serialize};

use crate::docx::model::{
    Alignment, BlockContainer, NativeCell, Relationships, RunColor, NORMAL_STYLE,
};
use crate::render::QuillParser;
use crate::utils::color::{contrasting_text, normalize_shade};
use crate::utils::error::{CellRef, LayoutError};
use crate::utils::markup::{escape_html, paragraph};

/// A pre-resolved display token: a judgement or score code with the symbol,
/// label and shade it is drawn with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgementToken {
    pub code: i32,
    pub symbol: String,
    pub label: String,
    /// `#RRGGBB` cell background
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shade: Option<String>,
    /// Rich-text explanation rendered below the label
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Draw only the symbol (score cells)
    #[serde(default)]
    pub compact: bool,
}

impl JudgementToken {
    pub fn new(code: i32, symbol: impl Into<String>, label: impl Into<String>) -> Self {
        JudgementToken {
            code,
            symbol: symbol.into(),
            label: label.into(),
            shade: None,
            description: String::new(),
            compact: false,
        }
    }

    pub fn with_shade(mut self, shade: impl Into<String>) -> Self {
        self.shade = Some(shade.into());
        self
    }

    pub fn with_description(mut self, html: impl Into<String>) -> Self {
        self.description = html.into();
        self
    }

    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    /// Text of the headline paragraph
    fn headline(&self) -> &str {
        if self.symbol.is_empty() {
            &self.label
        } else {
            &self.symbol
        }
    }

    fn shows_label(&self) -> bool {
        !self.compact && !self.symbol.is_empty() && !self.label.is_empty()
    }
}

/// Content of a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Quill rich text
    RichText(String),
    /// Judgement or score token
    Judgement(JudgementToken),
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::RichText(String::new())
    }
}

/// Preview form of a cell: position plus the HTML it renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPreview {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub html: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub header: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shade: Option<String>,
}

/// A rectangular region of the table grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub header: bool,
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub content: CellContent,
}

impl Cell {
    pub fn new(row: usize, column: usize, content: CellContent) -> Self {
        Cell {
            header: false,
            row,
            column,
            row_span: 1,
            col_span: 1,
            content,
        }
    }

    /// A rich-text cell
    pub fn rich(row: usize, column: usize, html: impl Into<String>) -> Self {
        Cell::new(row, column, CellContent::RichText(html.into()))
    }

    /// A rich-text cell holding escaped plain text
    pub fn text(row: usize, column: usize, text: &str) -> Self {
        Cell::rich(row, column, paragraph(text))
    }

    /// A header cell holding escaped plain text
    pub fn header_text(row: usize, column: usize, text: &str) -> Self {
        Cell::text(row, column, text).as_header()
    }

    pub fn judgement(row: usize, column: usize, token: JudgementToken) -> Self {
        Cell::new(row, column, CellContent::Judgement(token))
    }

    pub fn as_header(mut self) -> Self {
        self.header = true;
        self
    }

    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span;
        self.col_span = col_span;
        self
    }

    /// Reject zero spans
    pub fn checked(self) -> Result<Self, LayoutError> {
        if self.row_span == 0 || self.col_span == 0 {
            return Err(LayoutError::InvalidSpan {
                cell: self.to_ref(),
            });
        }
        Ok(self)
    }

    pub fn to_ref(&self) -> CellRef {
        CellRef {
            row: self.row,
            column: self.column,
            row_span: self.row_span,
            col_span: self.col_span,
        }
    }

    /// One past the last covered row, saturating at `usize::MAX`
    pub fn row_end(&self) -> usize {
        self.row.saturating_add(self.row_span)
    }

    /// One past the last covered column, saturating at `usize::MAX`
    pub fn column_end(&self) -> usize {
        self.column.saturating_add(self.col_span)
    }

    /// Grid positions covered by the cell, row by row
    pub fn footprint(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.row_end())
            .flat_map(move |r| (self.column..self.column_end()).map(move |c| (r, c)))
    }

    /// Linear sort key of the top-left corner
    pub fn row_order_index(&self, total_columns: usize) -> usize {
        self.row
            .saturating_mul(total_columns)
            .saturating_add(self.column)
    }

    /// Normalized background of judgement cells
    fn content_shade(&self) -> Option<String> {
        match self.content {
            CellContent::Judgement(ref token) => token.shade.as_deref().and_then(normalize_shade),
            CellContent::RichText(_) => None,
        }
    }

    /// Markup the cell renders, for previews
    pub fn to_html(&self) -> String {
        match self.content {
            CellContent::RichText(ref html) => html.clone(),
            CellContent::Judgement(ref token) => {
                let mut html = format!("<p><strong>{}</strong></p>", escape_html(token.headline()));
                if token.shows_label() {
                    html.push_str(&paragraph(&token.label));
                }
                if !token.compact {
                    html.push_str(&token.description);
                }
                html
            }
        }
    }

    pub fn to_dict(&self) -> CellPreview {
        CellPreview {
            row: self.row,
            column: self.column,
            row_span: self.row_span,
            col_span: self.col_span,
            html: self.to_html(),
            header: self.header,
            shade: self.content_shade().map(|hex| format!("#{}", hex)),
        }
    }

    /// Populate a native cell; `header_fill` shades header cells
    pub fn to_docx(
        &self,
        native: &mut NativeCell,
        parser: &mut QuillParser,
        rels: &mut Relationships,
        header_fill: Option<&str>,
    ) {
        match self.content {
            CellContent::RichText(ref html) => {
                parser.feed(html, native, rels);
            }
            CellContent::Judgement(ref token) => {
                let fill = self.content_shade();
                let text_color = fill.as_deref().map(contrasting_text);

                let headline = native.add_paragraph(NORMAL_STYLE);
                headline.alignment = Some(Alignment::Center);
                let run = headline.add_run(token.headline());
                run.bold = true;
                if let Some(color) = text_color {
                    run.color = Some(RunColor::rgb(color));
                }

                if token.shows_label() {
                    let label = native.add_paragraph(NORMAL_STYLE);
                    label.alignment = Some(Alignment::Center);
                    let run = label.add_run(token.label.as_str());
                    if let Some(color) = text_color {
                        run.color = Some(RunColor::rgb(color));
                    }
                }
                if !token.compact && !token.description.is_empty() {
                    parser.feed(&token.description, native, rels);
                }
                native.shade = fill;
            }
        }

        if self.header && native.shade.is_none() {
            native.shade = header_fill.map(str::to_string);
        }
        if native.paragraphs.is_empty() {
            // Word requires at least one paragraph per cell
            native.add_paragraph(NORMAL_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::NativeTable;
    use pretty_assertions::assert_eq;

    fn render(cell: &Cell, header_fill: Option<&str>) -> NativeCell {
        let mut table = NativeTable::new(1, 1);
        let mut rels = Relationships::default();
        let mut parser = QuillParser::new(None);
        let native = table.cell_mut(0, 0).unwrap();
        native.strip_default_paragraph();
        cell.to_docx(native, &mut parser, &mut rels, header_fill);
        native.clone()
    }

    #[test]
    fn test_row_order_index() {
        let cell = Cell::text(2, 3, "x");
        assert_eq!(cell.row_order_index(5), 13);
        assert_eq!(Cell::text(0, 0, "x").row_order_index(5), 0);
    }

    #[test]
    fn test_footprint() {
        let cell = Cell::text(1, 2, "x").with_span(2, 2);
        let positions: Vec<_> = cell.footprint().collect();
        assert_eq!(positions, vec![(1, 2), (1, 3), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_checked_rejects_zero_span() {
        let err = Cell::text(0, 0, "x").with_span(0, 1).checked().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidSpan { .. }));
        assert!(Cell::text(0, 0, "x").with_span(1, 3).checked().is_ok());
    }

    #[test]
    fn test_to_dict_rich_text() {
        let preview = Cell::rich(0, 1, "<p>B1</p>").with_span(1, 2).to_dict();
        assert_eq!(
            preview,
            CellPreview {
                row: 0,
                column: 1,
                row_span: 1,
                col_span: 2,
                html: "<p>B1</p>".to_string(),
                header: false,
                shade: None,
            }
        );
        let json = serde_json::to_value(&preview).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"row": 0, "column": 1, "row_span": 1, "col_span": 2, "html": "<p>B1</p>"})
        );
    }

    #[test]
    fn test_to_dict_judgement() {
        let token = JudgementToken::new(20, "⊕⊕⊙", "Moderate")
            .with_shade("#ffcc00")
            .with_description("<p>why</p>");
        let preview = Cell::judgement(0, 0, token).to_dict();
        assert_eq!(
            preview.html,
            "<p><strong>⊕⊕⊙</strong></p><p>Moderate</p><p>why</p>"
        );
        assert_eq!(preview.shade.as_deref(), Some("#FFCC00"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(Cell::text(0, 0, "a<b").to_html(), "<p>a&lt;b</p>");
    }

    #[test]
    fn test_rich_text_to_docx() {
        let native = render(&Cell::rich(0, 0, "<p>A1</p>"), None);
        assert_eq!(native.paragraphs.len(), 1);
        assert_eq!(native.text(), "A1");
        assert_eq!(native.shade, None);
    }

    #[test]
    fn test_header_shade() {
        let native = render(&Cell::header_text(0, 0, "Study"), Some("EEEEEE"));
        assert_eq!(native.shade.as_deref(), Some("EEEEEE"));

        let plain = render(&Cell::text(0, 0, "Study"), Some("EEEEEE"));
        assert_eq!(plain.shade, None);
    }

    #[test]
    fn test_judgement_to_docx() {
        let token = JudgementToken::new(14, "--", "Definitely high risk of bias")
            .with_shade("#CC3333")
            .compact();
        let native = render(&Cell::judgement(0, 0, token), Some("EEEEEE"));
        assert_eq!(native.paragraphs.len(), 1);
        assert_eq!(native.text(), "--");
        assert_eq!(native.shade.as_deref(), Some("CC3333"));

        let p = &native.paragraphs[0];
        assert_eq!(p.alignment, Some(Alignment::Center));
        let run = p.runs().next().unwrap();
        assert!(run.bold);
        assert_eq!(run.color.as_ref().map(|c| c.hex.as_str()), Some("FFFFFF"));
    }

    #[test]
    fn test_judgement_without_symbol_shows_label() {
        let token = JudgementToken::new(900, "", "Not yet assessed");
        let native = render(&Cell::judgement(0, 0, token), None);
        assert_eq!(native.text(), "Not yet assessed");
    }

    #[test]
    fn test_empty_rich_text_keeps_a_paragraph() {
        let native = render(&Cell::rich(0, 0, ""), None);
        assert_eq!(native.paragraphs.len(), 1);
        assert!(native.paragraphs[0].is_empty());
    }
}
