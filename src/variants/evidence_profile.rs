//! Evidence profile tables
//!
//! A landscape table in six columns. Two header rows are followed by one
//! block per evidence stream (exposed humans, animals, mechanistic), each
//! with its own title and column header rows. The last column holds the
//! summary judgement, spanning every stream row.
//!
//! Stream blocks are laid out in their own coordinates and stacked with
//! [`CellGroup::add_offset`].

use serde::{Deserialize, Serialize};

use super::common::{relative_widths, Judgement};
use super::TableVariant;
use crate::core::{Cell, CellGroup, RenderOptions, Table};
use crate::data::judgements::{factor_label, FactorDirection};
use crate::docx::model::NativeTable;
use crate::docx::styles::text_width;
use crate::utils::error::TableResult;
use crate::utils::markup::escape_html;

const COLUMNS: usize = 6;
/// Columns of a stream block; the last table column is the summary
const STREAM_COLUMNS: usize = COLUMNS - 1;
const COLUMN_WEIGHTS: [u32; COLUMNS] = [20, 22, 16, 16, 14, 18];

fn strong(text: &str) -> String {
    format!("<p><strong>{}</strong></p>", escape_html(text))
}

/// A certainty factor with an optional rich-text note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub key: i32,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertaintyFactors {
    pub factors: Vec<Factor>,
    /// Rich-text discussion after the factor list
    pub text: String,
}

impl CertaintyFactors {
    fn to_html(&self, direction: FactorDirection) -> String {
        let mut html = String::new();
        for factor in &self.factors {
            let label = factor_label(direction, factor.key).unwrap_or_else(|| {
                log::warn!("unknown certainty factor {} ({})", factor.key, direction);
                "Unknown factor"
            });
            html.push_str(&format!("<p><em>{}</em></p>", escape_html(label)));
            html.push_str(&factor.text);
        }
        html.push_str(&self.text);
        html
    }
}

/// A row of a human or animal evidence stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceRow {
    /// Studies, outcomes and confidence
    pub evidence: String,
    /// Summary and key findings
    pub summary: String,
    /// Factors that increase certainty
    pub certain_factors: CertaintyFactors,
    /// Factors that decrease certainty
    pub uncertain_factors: CertaintyFactors,
    pub judgement: Judgement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceStream {
    pub title: String,
    /// Show the first row's judgement once, spanning every row
    #[serde(default)]
    pub merge_judgement: bool,
    #[serde(default)]
    pub rows: Vec<EvidenceRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanisticRow {
    pub description: String,
    pub summary: String,
    pub judgement: Judgement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanisticStream {
    pub title: String,
    /// Header of the first column
    pub col_header_1: String,
    #[serde(default)]
    pub merge_judgement: bool,
    #[serde(default)]
    pub rows: Vec<MechanisticRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceProfileTable {
    pub title: String,
    pub exposed_human: EvidenceStream,
    pub animal: EvidenceStream,
    pub mechanistic: MechanisticStream,
    pub summary_judgement: Judgement,
}

/// Cells of a stream block plus the block-local rows to shade
struct Block {
    cells: CellGroup,
    header_rows: Vec<usize>,
}

/// Judgement column of a block: one cell per row, or one merged cell
fn judgement_cells<'a>(
    judgements: impl Iterator<Item = &'a Judgement>,
    merge: bool,
    first_row: usize,
) -> Vec<Cell> {
    let judgements: Vec<_> = judgements.collect();
    let column = STREAM_COLUMNS - 1;
    match judgements.first() {
        Some(first) if merge => {
            vec![Cell::judgement(first_row, column, first.stream_token())
                .with_span(judgements.len(), 1)]
        }
        _ => judgements
            .iter()
            .enumerate()
            .map(|(i, j)| Cell::judgement(first_row + i, column, j.stream_token()))
            .collect(),
    }
}

impl EvidenceStream {
    fn block(&self) -> Block {
        let mut cells = CellGroup::new(vec![
            Cell::rich(0, 0, strong(&self.title)).with_span(1, STREAM_COLUMNS)
        ]);
        cells.extend(
            [
                "Studies, outcomes, and confidence",
                "Summary and key findings",
                "Factors that increase certainty",
                "Factors that decrease certainty",
                "Evidence stream judgment",
            ]
            .iter()
            .enumerate()
            .map(|(column, label)| Cell::rich(1, column, strong(label))),
        );

        for (i, row) in self.rows.iter().enumerate() {
            let r = i + 2;
            cells.push(Cell::rich(r, 0, row.evidence.clone()));
            cells.push(Cell::rich(r, 1, row.summary.clone()));
            cells.push(Cell::rich(
                r,
                2,
                row.certain_factors.to_html(FactorDirection::Increase),
            ));
            cells.push(Cell::rich(
                r,
                3,
                row.uncertain_factors.to_html(FactorDirection::Decrease),
            ));
        }
        cells.extend(judgement_cells(
            self.rows.iter().map(|r| &r.judgement),
            self.merge_judgement,
            2,
        ));
        Block {
            cells,
            header_rows: vec![0, 1],
        }
    }
}

impl MechanisticStream {
    fn block(&self) -> Block {
        let mut cells = CellGroup::new(vec![
            Cell::rich(0, 0, strong(&self.title)).with_span(1, STREAM_COLUMNS),
            Cell::rich(1, 0, strong(&self.col_header_1)),
            Cell::rich(1, 1, strong("Summary of key findings and interpretation"))
                .with_span(1, STREAM_COLUMNS - 2),
            Cell::rich(1, STREAM_COLUMNS - 1, strong("Judgment(s) and rationale")),
        ]);
        for (i, row) in self.rows.iter().enumerate() {
            let r = i + 2;
            cells.push(Cell::rich(r, 0, row.description.clone()));
            cells.push(Cell::rich(r, 1, row.summary.clone()).with_span(1, STREAM_COLUMNS - 2));
        }
        cells.extend(judgement_cells(
            self.rows.iter().map(|r| &r.judgement),
            self.merge_judgement,
            2,
        ));
        Block {
            cells,
            header_rows: vec![0, 1],
        }
    }
}

impl EvidenceProfileTable {
    /// Every cell, plus the rows rendered with the header shade
    fn layout(&self) -> (CellGroup, Vec<usize>) {
        let mut layout = CellGroup::new(vec![
            Cell::rich(0, 0, strong(&self.title)).with_span(1, COLUMNS),
            Cell::rich(1, 0, strong("Evidence stream summary and interpretation"))
                .with_span(1, STREAM_COLUMNS),
            Cell::rich(1, STREAM_COLUMNS, strong("Inferences and summary judgment")),
        ]);
        let mut header_rows = vec![0, 1];

        let mut blocks = Vec::new();
        for (name, stream) in [("exposed human", &self.exposed_human), ("animal", &self.animal)] {
            if stream.rows.is_empty() {
                log::debug!("skipping empty {} evidence stream", name);
            } else {
                blocks.push(stream.block());
            }
        }
        if self.mechanistic.rows.is_empty() {
            log::debug!("skipping empty mechanistic evidence stream");
        } else {
            blocks.push(self.mechanistic.block());
        }

        let first = layout.rows();
        let mut next = first;
        for block in blocks {
            let height = block.cells.rows();
            header_rows.extend(block.header_rows.iter().map(|r| r + next));
            layout.merge(block.cells.offset(next, 0));
            next += height;
        }

        if next == first {
            layout.push(Cell::rich(first, 0, "").with_span(1, STREAM_COLUMNS));
            next += 1;
        }
        layout.push(
            Cell::judgement(first, STREAM_COLUMNS, self.summary_judgement.summary_token())
                .with_span(next - first, 1),
        );
        (layout, header_rows)
    }
}

impl TableVariant for EvidenceProfileTable {
    fn build_default() -> Self {
        EvidenceProfileTable {
            title: "Evidence profile table".to_string(),
            exposed_human: EvidenceStream {
                title: "Evidence from studies of exposed humans".to_string(),
                merge_judgement: true,
                rows: vec![EvidenceRow::default()],
            },
            animal: EvidenceStream {
                title: "Evidence from animal studies".to_string(),
                merge_judgement: true,
                rows: vec![EvidenceRow::default()],
            },
            mechanistic: MechanisticStream {
                title: "Mechanistic evidence and supplemental information".to_string(),
                col_header_1: "Biological events or pathways".to_string(),
                merge_judgement: true,
                rows: vec![MechanisticRow::default()],
            },
            summary_judgement: Judgement::default(),
        }
    }

    fn build_table(&self) -> TableResult<Table> {
        let (layout, _) = self.layout();
        let widths = relative_widths(&COLUMN_WEIGHTS, text_width(true));
        Ok(Table::try_from(layout)?.with_column_widths(widths))
    }

    fn landscape(&self) -> bool {
        true
    }

    fn post_render(&self, native: &mut NativeTable, opts: &RenderOptions) {
        let Some(fill) = opts.header_fill() else {
            return;
        };
        let (_, header_rows) = self.layout();
        for row in header_rows {
            // stream header rows stop short of the summary column
            let columns = if row < 2 { 0..COLUMNS } else { 0..STREAM_COLUMNS };
            native.shade_row(row, columns, &fill);
        }
    }
}
