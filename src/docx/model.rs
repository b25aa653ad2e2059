//! In-memory WordprocessingML object model
//!
//! A deliberately small subset of the `.docx` model: a body of paragraphs and
//! tables, paragraphs made of runs and hyperlinks, and tables whose cells are
//! merged the way Word merges them (`gridSpan` horizontally, `vMerge`
//! vertically).

use std::ops::Range;
use std::path::Path;

use indexmap::IndexMap;

use crate::utils::error::TableResult;

/// Style name of the default paragraph style
pub const NORMAL_STYLE: &str = "Normal";

/// Color Word uses for the `hyperlink` theme slot
pub const HYPERLINK_COLOR: &str = "0563C1";

/// Paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Value of the `w:jc` element
    pub fn to_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Run font color, optionally bound to a theme slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunColor {
    /// `RRGGBB` without the leading `#`
    pub hex: String,
    pub theme: Option<&'static str>,
}

impl RunColor {
    pub fn rgb(hex: impl Into<String>) -> Self {
        RunColor {
            hex: hex.into(),
            theme: None,
        }
    }

    pub fn hyperlink() -> Self {
        RunColor {
            hex: HYPERLINK_COLOR.to_string(),
            theme: Some("hyperlink"),
        }
    }
}

/// A span of uniformly formatted text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<RunColor>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Apply the visual hyperlink style: underline plus the theme link color
    pub fn apply_hyperlink_style(&mut self) {
        self.underline = true;
        self.color = Some(RunColor::hyperlink());
    }

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline && self.color.is_none()
    }
}

/// Runs wrapped in a `w:hyperlink` pointing at an external relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub rel_id: String,
    pub target: String,
    pub runs: Vec<Run>,
}

/// Paragraph child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Run(Run),
    Hyperlink(Hyperlink),
}

/// A paragraph with a named style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Style *name*, e.g. `Heading 1`; the writer derives the style id
    pub style: String,
    pub alignment: Option<Alignment>,
    pub content: Vec<Inline>,
}

impl Paragraph {
    pub fn new(style: impl Into<String>) -> Self {
        Paragraph {
            style: style.into(),
            alignment: None,
            content: Vec::new(),
        }
    }

    /// Append a plain run and return it for formatting
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.content.push(Inline::Run(Run::new(text)));
        match self.content.last_mut() {
            Some(Inline::Run(run)) => run,
            _ => unreachable!("a run was just pushed"),
        }
    }

    /// The run that receives text next: the last run, looking inside a
    /// trailing hyperlink
    pub fn last_run_mut(&mut self) -> Option<&mut Run> {
        match self.content.last_mut()? {
            Inline::Run(run) => Some(run),
            Inline::Hyperlink(link) => link.runs.last_mut(),
        }
    }

    /// All runs in document order, hyperlink runs included
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().flat_map(|inline| match inline {
            Inline::Run(run) => std::slice::from_ref(run).iter(),
            Inline::Hyperlink(link) => link.runs.iter(),
        })
    }

    pub fn hyperlinks(&self) -> impl Iterator<Item = &Hyperlink> {
        self.content.iter().filter_map(|inline| match inline {
            Inline::Hyperlink(link) => Some(link),
            Inline::Run(_) => None,
        })
    }

    /// Concatenated text of every run
    pub fn text(&self) -> String {
        self.runs().map(|run| run.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs().all(|run| run.text.is_empty())
    }
}

/// A container paragraphs can be appended to (document body or table cell)
pub trait BlockContainer {
    /// Append a new paragraph with the given style
    fn add_paragraph(&mut self, style: &str) -> &mut Paragraph;

    /// The paragraph most recently appended, if the container ends with one
    fn last_paragraph_mut(&mut self) -> Option<&mut Paragraph>;

    /// Whether the last child of the container is a paragraph
    fn ends_with_paragraph(&self) -> bool;
}

/// Vertical merge marker of a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMerge {
    Restart,
    Continue,
}

/// A cell of a native table grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCell {
    pub paragraphs: Vec<Paragraph>,
    /// Number of grid columns covered by this cell
    pub grid_span: usize,
    pub v_merge: Option<VMerge>,
    /// Background fill `RRGGBB`
    pub shade: Option<String>,
    /// Swallowed by a horizontal merge; not emitted
    pub covered: bool,
}

impl NativeCell {
    fn new() -> Self {
        NativeCell {
            paragraphs: vec![Paragraph::new(NORMAL_STYLE)],
            grid_span: 1,
            v_merge: None,
            shade: None,
            covered: false,
        }
    }

    /// Remove the empty paragraph every fresh cell starts with
    pub fn strip_default_paragraph(&mut self) {
        if self.paragraphs.len() == 1 && self.paragraphs[0].content.is_empty() {
            self.paragraphs.clear();
        }
    }

    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl BlockContainer for NativeCell {
    fn add_paragraph(&mut self, style: &str) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::new(style));
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    fn last_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.paragraphs.last_mut()
    }

    fn ends_with_paragraph(&self) -> bool {
        !self.paragraphs.is_empty()
    }
}

/// A table in the document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTable {
    pub rows: Vec<Vec<NativeCell>>,
    pub columns: usize,
    /// Column widths in twentieths of a point
    pub column_widths: Option<Vec<u32>>,
    /// Table style name
    pub style: String,
}

impl NativeTable {
    pub fn new(rows: usize, columns: usize) -> Self {
        NativeTable {
            rows: (0..rows)
                .map(|_| (0..columns).map(|_| NativeCell::new()).collect())
                .collect(),
            columns,
            column_widths: None,
            style: "Table Grid".to_string(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&NativeCell> {
        self.rows.get(row)?.get(column)
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut NativeCell> {
        self.rows.get_mut(row)?.get_mut(column)
    }

    /// Merge the rectangle spanned by two corner cells and return the
    /// surviving top-left cell
    pub fn merge(
        &mut self,
        (row, column): (usize, usize),
        (last_row, last_column): (usize, usize),
    ) -> Option<&mut NativeCell> {
        if last_row < row
            || last_column < column
            || last_row >= self.rows.len()
            || last_column >= self.columns
        {
            return None;
        }

        let width = last_column - column + 1;
        for r in row..=last_row {
            let cells = &mut self.rows[r];
            for covered in &mut cells[column + 1..=last_column] {
                covered.covered = true;
            }
            let cell = &mut cells[column];
            cell.grid_span = width;
            if last_row > row {
                cell.v_merge = Some(if r == row {
                    VMerge::Restart
                } else {
                    VMerge::Continue
                });
            }
        }
        self.cell_mut(row, column)
    }

    /// Shade the cells of `row` that start within `columns`
    pub fn shade_row(&mut self, row: usize, columns: Range<usize>, shade: &str) {
        if let Some(cells) = self.rows.get_mut(row) {
            let end = columns.end.min(cells.len());
            let start = columns.start.min(end);
            for cell in cells[start..end].iter_mut().filter(|c| !c.covered) {
                if cell.v_merge != Some(VMerge::Continue) {
                    cell.shade = Some(shade.to_string());
                }
            }
        }
    }
}

/// Body child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    Paragraph(Paragraph),
    Table(NativeTable),
}

/// The document body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub items: Vec<BodyItem>,
}

impl Body {
    /// Append an empty `rows x columns` table
    pub fn add_table(&mut self, rows: usize, columns: usize) -> &mut NativeTable {
        self.items
            .push(BodyItem::Table(NativeTable::new(rows, columns)));
        match self.items.last_mut() {
            Some(BodyItem::Table(table)) => table,
            _ => unreachable!("a table was just pushed"),
        }
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Paragraph(p) => Some(p),
            BodyItem::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &NativeTable> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Table(t) => Some(t),
            BodyItem::Paragraph(_) => None,
        })
    }

    /// The table stored at body position `index`
    pub fn table_at_mut(&mut self, index: usize) -> Option<&mut NativeTable> {
        match self.items.get_mut(index)? {
            BodyItem::Table(t) => Some(t),
            BodyItem::Paragraph(_) => None,
        }
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut NativeTable> {
        self.items.iter_mut().filter_map(|item| match item {
            BodyItem::Table(t) => Some(t),
            BodyItem::Paragraph(_) => None,
        })
    }
}

impl BlockContainer for Body {
    fn add_paragraph(&mut self, style: &str) -> &mut Paragraph {
        self.items.push(BodyItem::Paragraph(Paragraph::new(style)));
        match self.items.last_mut() {
            Some(BodyItem::Paragraph(p)) => p,
            _ => unreachable!("a paragraph was just pushed"),
        }
    }

    fn last_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self.items.last_mut()? {
            BodyItem::Paragraph(p) => Some(p),
            BodyItem::Table(_) => None,
        }
    }

    fn ends_with_paragraph(&self) -> bool {
        matches!(self.items.last(), Some(BodyItem::Paragraph(_)))
    }
}

/// Relationship ids taken by the fixed document parts
pub const RESERVED_RELATIONSHIPS: usize = 2;

/// External relationships of the main document part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    /// target -> relationship id, in registration order
    hyperlinks: IndexMap<String, String>,
}

impl Relationships {
    /// Register an external hyperlink target; repeated targets share an id
    pub fn add_hyperlink(&mut self, target: &str) -> String {
        if let Some(id) = self.hyperlinks.get(target) {
            return id.clone();
        }
        let id = format!(
            "rId{}",
            RESERVED_RELATIONSHIPS + self.hyperlinks.len() + 1
        );
        self.hyperlinks.insert(target.to_string(), id.clone());
        id
    }

    /// `(id, target)` pairs in registration order
    pub fn hyperlinks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hyperlinks
            .iter()
            .map(|(target, id)| (id.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.hyperlinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hyperlinks.is_empty()
    }
}

/// A word-processing document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub body: Body,
    pub relationships: Relationships,
    /// Landscape page orientation
    pub landscape: bool,
    /// Core property title
    pub title: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(&mut self, text: &str, style: &str) -> &mut Paragraph {
        let paragraph = self.body.add_paragraph(style);
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        paragraph
    }

    /// Borrow the body and the relationship table at the same time
    pub fn split_mut(&mut self) -> (&mut Body, &mut Relationships) {
        (&mut self.body, &mut self.relationships)
    }

    pub fn tables(&self) -> impl Iterator<Item = &NativeTable> {
        self.body.tables()
    }

    /// Serialize as `.docx` bytes
    pub fn to_bytes(&self) -> TableResult<Vec<u8>> {
        super::writer::write_docx(self)
    }

    /// Write a `.docx` file
    pub fn save(&self, path: impl AsRef<Path>) -> TableResult<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}
