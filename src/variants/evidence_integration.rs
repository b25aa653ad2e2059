//! Evidence integration summary tables

use serde::{Deserialize, Serialize};

use super::common::Judgement;
use super::TableVariant;
use crate::core::{Cell, CellGroup, Table};
use crate::utils::error::TableResult;
use crate::utils::markup::escape_html;

const COLUMNS: usize = 4;

/// One evidence stream and the judgement drawn from it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationStream {
    pub title: String,
    /// Rich-text summary of the evidence
    pub summary: String,
    pub judgement: Judgement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceIntegrationTable {
    pub title: String,
    #[serde(default)]
    pub streams: Vec<IntegrationStream>,
    pub summary_judgement: Judgement,
}

impl TableVariant for EvidenceIntegrationTable {
    fn build_default() -> Self {
        let stream = |title: &str| IntegrationStream {
            title: title.to_string(),
            ..IntegrationStream::default()
        };
        EvidenceIntegrationTable {
            title: "Evidence integration".to_string(),
            streams: vec![
                stream("Human"),
                stream("Animal"),
                stream("Mechanistic"),
            ],
            summary_judgement: Judgement::default(),
        }
    }

    fn build_table(&self) -> TableResult<Table> {
        let mut layout = CellGroup::new(vec![Cell::rich(
            0,
            0,
            format!("<h2>{}</h2>", escape_html(&self.title)),
        )
        .with_span(1, COLUMNS)
        .as_header()]);
        layout.extend(
            [
                "Evidence stream",
                "Summary of evidence",
                "Evidence stream judgment",
                "Integrated judgment",
            ]
            .iter()
            .enumerate()
            .map(|(column, label)| Cell::header_text(1, column, label)),
        );

        let streams: CellGroup = self
            .streams
            .iter()
            .enumerate()
            .flat_map(|(row, stream)| {
                [
                    Cell::text(row, 0, &stream.title),
                    Cell::rich(row, 1, stream.summary.clone()),
                    Cell::judgement(row, 2, stream.judgement.stream_token()),
                ]
            })
            .collect();
        let height = streams.rows().max(1);
        if streams.is_empty() {
            layout.push(Cell::rich(2, 0, "").with_span(1, COLUMNS - 1));
        }
        layout.merge(streams.offset(2, 0));
        layout.push(
            Cell::judgement(2, COLUMNS - 1, self.summary_judgement.summary_token())
                .with_span(height, 1),
        );

        Ok(Table::try_from(layout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellContent, RenderOptions};
    use crate::docx::VMerge;
    use pretty_assertions::assert_eq;

    fn fixture() -> EvidenceIntegrationTable {
        let mut table = EvidenceIntegrationTable::build_default();
        table.streams[0].judgement.judgement = 10;
        table.streams[1].summary = "<p>tumors in <em>two</em> species</p>".to_string();
        table.streams[1].judgement.judgement = 30;
        table.summary_judgement.judgement = 20;
        table
    }

    #[test]
    fn test_layout() {
        let table = fixture().build_table().unwrap();
        assert_eq!((table.rows(), table.columns()), (5, 4));

        let summary = table
            .cells()
            .iter()
            .find(|c| c.column == 3 && c.row == 2)
            .unwrap();
        assert_eq!(summary.row_span, 3);
        match summary.content {
            CellContent::Judgement(ref token) => {
                assert_eq!(token.symbol, "⊕⊕⊙");
                assert_eq!(token.label, "Evidence indicates (likely)");
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_stream_rows() {
        let preview = fixture().to_dict().unwrap();
        let human: Vec<_> = preview.iter().filter(|c| c.row == 2).collect();
        assert_eq!(human[0].html, "<p>Human</p>");
        assert_eq!(human[2].html, "<p><strong>⊕⊙⊙</strong></p><p>Slight</p>");
    }

    #[test]
    fn test_no_streams() {
        let mut table = fixture();
        table.streams.clear();
        let built = table.build_table().unwrap();
        assert_eq!(built.rows(), 3);
    }

    #[test]
    fn test_render() {
        let doc = fixture().to_docx(None, &RenderOptions::default()).unwrap();
        assert!(!doc.landscape);
        let native = doc.tables().next().unwrap();
        assert_eq!(native.cell(0, 0).unwrap().grid_span, 4);
        assert_eq!(native.cell(0, 0).unwrap().paragraphs[0].style, "Heading 2");
        assert_eq!(native.cell(1, 3).unwrap().shade.as_deref(), Some("EEEEEE"));
        assert_eq!(native.cell(3, 1).unwrap().text(), "tumors in two species");
        assert_eq!(native.cell(4, 3).unwrap().v_merge, Some(VMerge::Continue));
    }
}
