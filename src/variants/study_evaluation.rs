//! Studies against risk-of-bias metrics
//!
//! One row per study (or experiment, animal group, outcome), one column per
//! attribute. Metric columns show the score a study received, shaded by the
//! score's color. Column groups can be labeled with subheaders.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::TableVariant;
use crate::core::{Cell, CellContent, CellGroup, JudgementToken, Table};
use crate::data::judgements::{rob_score, RobScore, NOT_MATCHED};
use crate::utils::error::TableResult;
use crate::utils::markup::paragraph;

/// What a column displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAttribute {
    /// Score of `metric_id`
    Rob,
    ShortCitation,
    StudyName,
    ExperimentName,
    AnimalGroupName,
    OutcomeName,
    /// The column's own `html`
    FreeHtml,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationColumn {
    pub attribute: ColumnAttribute,
    /// Metric scored in `rob` columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<i64>,
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub html: String,
}

/// Hand-written content replacing one cell of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizedCell {
    pub key: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRow {
    /// Id of the data row shown
    pub id: i64,
    #[serde(default)]
    pub customized: Vec<CustomizedCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subheader {
    pub label: String,
    pub start: usize,
    pub length: usize,
}

/// A row of the study data the table is drawn from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyRecord {
    pub id: i64,
    pub study_id: i64,
    pub short_citation: String,
    pub study_name: String,
    pub experiment_name: String,
    pub animal_group_name: String,
    pub outcome_name: String,
}

/// A risk-of-bias score of one study for one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub study_id: i64,
    pub metric_id: i64,
    pub score: i32,
    /// Scope of an overriding score; `None` for the study-wide default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_scope: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationData {
    pub rows: Vec<StudyRecord>,
    pub scores: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyEvaluationTable {
    pub rows: Vec<EvaluationRow>,
    pub columns: Vec<EvaluationColumn>,
    #[serde(default)]
    pub subheaders: Vec<Subheader>,
    #[serde(default)]
    pub data: EvaluationData,
}

/// Score lookup keyed by (study, metric)
struct ScoreIndex<'a> {
    scores: FxHashMap<(i64, i64), Vec<&'a ScoreRecord>>,
}

impl<'a> ScoreIndex<'a> {
    fn new(scores: &'a [ScoreRecord]) -> Self {
        let mut index: FxHashMap<(i64, i64), Vec<&ScoreRecord>> = FxHashMap::default();
        for score in scores {
            index
                .entry((score.study_id, score.metric_id))
                .or_default()
                .push(score);
        }
        ScoreIndex { scores: index }
    }

    /// Preferred score: the default one when several match, the not-matched
    /// sentinel when none do
    fn lookup(&self, study_id: i64, metric_id: i64) -> RobScore {
        let Some(matches) = self.scores.get(&(study_id, metric_id)) else {
            return NOT_MATCHED;
        };
        let chosen = matches
            .iter()
            .find(|s| s.override_scope.is_none())
            .or_else(|| matches.first());
        match chosen {
            Some(score) => rob_score(score.score).copied().unwrap_or_else(|| {
                log::warn!("unknown score code {}", score.score);
                NOT_MATCHED
            }),
            None => NOT_MATCHED,
        }
    }
}

impl StudyEvaluationTable {
    fn header_rows(&self) -> usize {
        if self.subheaders.is_empty() {
            1
        } else {
            2
        }
    }

    /// Subheader row, with blank header cells filling the gaps
    fn subheader_group(&self) -> CellGroup {
        let mut group = CellGroup::default();
        if self.subheaders.is_empty() {
            return group;
        }
        let mut covered = vec![false; self.columns.len()];
        for subheader in &self.subheaders {
            group.push(
                Cell::header_text(0, subheader.start, &subheader.label)
                    .with_span(1, subheader.length),
            );
            let end = subheader
                .start
                .saturating_add(subheader.length)
                .min(covered.len());
            for slot in covered.iter_mut().take(end).skip(subheader.start) {
                *slot = true;
            }
        }
        for (column, _) in covered.iter().enumerate().filter(|(_, c)| !**c) {
            group.push(Cell::rich(0, column, "").as_header());
        }
        group
    }

    fn column_header_group(&self) -> CellGroup {
        self.columns
            .iter()
            .enumerate()
            .map(|(column, col)| Cell::header_text(0, column, &col.label))
            .collect()
    }

    fn data_group(&self) -> CellGroup {
        let records: FxHashMap<i64, &StudyRecord> =
            self.data.rows.iter().map(|r| (r.id, r)).collect();
        let scores = ScoreIndex::new(&self.data.scores);

        let mut group = CellGroup::default();
        for (row, spec) in self.rows.iter().enumerate() {
            let record = records.get(&spec.id).copied();
            if record.is_none() {
                log::warn!("no data for row id {}; leaving it blank", spec.id);
            }
            for (column, col) in self.columns.iter().enumerate() {
                let content = match spec.customized.iter().find(|c| c.key == col.key) {
                    Some(custom) => CellContent::RichText(custom.html.clone()),
                    None => match record {
                        Some(record) => column_content(col, record, &scores),
                        None => CellContent::default(),
                    },
                };
                group.push(Cell::new(row, column, content));
            }
        }
        group
    }
}

/// Resolve one column attribute for one data row
fn column_content(col: &EvaluationColumn, record: &StudyRecord, scores: &ScoreIndex) -> CellContent {
    let text = |value: &str| CellContent::RichText(paragraph(value));
    match col.attribute {
        ColumnAttribute::Rob => {
            let score = match col.metric_id {
                Some(metric_id) => scores.lookup(record.study_id, metric_id),
                None => NOT_MATCHED,
            };
            CellContent::Judgement(
                JudgementToken::new(score.code, score.symbol, score.label)
                    .with_shade(score.shade)
                    .compact(),
            )
        }
        ColumnAttribute::ShortCitation => text(&record.short_citation),
        ColumnAttribute::StudyName => text(&record.study_name),
        ColumnAttribute::ExperimentName => text(&record.experiment_name),
        ColumnAttribute::AnimalGroupName => text(&record.animal_group_name),
        ColumnAttribute::OutcomeName => text(&record.outcome_name),
        ColumnAttribute::FreeHtml => CellContent::RichText(col.html.clone()),
    }
}

impl TableVariant for StudyEvaluationTable {
    fn build_default() -> Self {
        StudyEvaluationTable {
            rows: Vec::new(),
            columns: vec![
                EvaluationColumn {
                    attribute: ColumnAttribute::ShortCitation,
                    metric_id: None,
                    key: "study".to_string(),
                    label: "Study".to_string(),
                    html: String::new(),
                },
                EvaluationColumn {
                    attribute: ColumnAttribute::Rob,
                    metric_id: None,
                    key: "overall".to_string(),
                    label: "Overall confidence".to_string(),
                    html: String::new(),
                },
            ],
            subheaders: Vec::new(),
            data: EvaluationData::default(),
        }
    }

    fn build_table(&self) -> TableResult<Table> {
        let header_rows = self.header_rows();
        let mut layout = self.subheader_group();
        layout.merge(self.column_header_group().offset(header_rows - 1, 0));
        layout.merge(self.data_group().offset(header_rows, 0));
        let rows = header_rows + self.rows.len();
        Ok(Table::with_extent(layout.cells, rows, self.columns.len())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RenderOptions;
    use crate::utils::error::LayoutError;
    use pretty_assertions::assert_eq;

    fn column(attribute: ColumnAttribute, key: &str, metric_id: Option<i64>) -> EvaluationColumn {
        EvaluationColumn {
            attribute,
            metric_id,
            key: key.to_string(),
            label: key.to_uppercase(),
            html: String::new(),
        }
    }

    fn score(study_id: i64, metric_id: i64, score: i32, scope: Option<&str>) -> ScoreRecord {
        ScoreRecord {
            study_id,
            metric_id,
            score,
            override_scope: scope.map(str::to_string),
        }
    }

    fn fixture() -> StudyEvaluationTable {
        StudyEvaluationTable {
            rows: vec![
                EvaluationRow {
                    id: 1,
                    customized: Vec::new(),
                },
                EvaluationRow {
                    id: 2,
                    customized: vec![CustomizedCell {
                        key: "name".to_string(),
                        html: "<p><em>custom</em></p>".to_string(),
                    }],
                },
            ],
            columns: vec![
                column(ColumnAttribute::ShortCitation, "citation", None),
                column(ColumnAttribute::StudyName, "name", None),
                column(ColumnAttribute::Rob, "blinding", Some(100)),
                column(ColumnAttribute::Rob, "exposure", Some(200)),
            ],
            subheaders: Vec::new(),
            data: EvaluationData {
                rows: vec![
                    StudyRecord {
                        id: 1,
                        study_id: 10,
                        short_citation: "Smith 2020".to_string(),
                        study_name: "Smith cohort".to_string(),
                        ..StudyRecord::default()
                    },
                    StudyRecord {
                        id: 2,
                        study_id: 20,
                        short_citation: "Jones 2021".to_string(),
                        study_name: "Jones trial".to_string(),
                        ..StudyRecord::default()
                    },
                ],
                scores: vec![
                    score(10, 100, 17, None),
                    score(20, 100, 15, Some("endpoint:5")),
                    score(20, 100, 14, None),
                ],
            },
        }
    }

    fn token_at(table: &Table, row: usize, column: usize) -> JudgementToken {
        let cell = table
            .cells()
            .iter()
            .find(|c| c.row == row && c.column == column)
            .unwrap();
        match cell.content {
            CellContent::Judgement(ref token) => token.clone(),
            ref other => panic!("expected a judgement, got {:?}", other),
        }
    }

    #[test]
    fn test_layout() {
        let table = fixture().build_table().unwrap();
        assert_eq!((table.rows(), table.columns()), (3, 4));
        let headers: Vec<_> = table.cells().iter().filter(|c| c.header).map(|c| c.row).collect();
        assert_eq!(headers, vec![0, 0, 0, 0]);
        assert_eq!(table.cells()[4].to_html(), "<p>Smith 2020</p>");
    }

    #[test]
    fn test_score_lookup() {
        let table = fixture().build_table().unwrap();

        let smith = token_at(&table, 1, 2);
        assert_eq!(smith.symbol, "++");
        assert_eq!(smith.shade.as_deref(), Some("#00CC00"));

        // default score preferred over the override
        let jones = token_at(&table, 2, 2);
        assert_eq!(jones.symbol, "--");

        let missing = token_at(&table, 1, 3);
        assert_eq!(missing.symbol, "NM");
        assert_eq!(missing.label, "N/A");
        assert_eq!(missing.shade.as_deref(), Some("#DFDFDF"));
    }

    #[test]
    fn test_only_overrides_uses_first() {
        let scores = vec![
            score(1, 1, 16, Some("a")),
            score(1, 1, 15, Some("b")),
        ];
        let index = ScoreIndex::new(&scores);
        assert_eq!(index.lookup(1, 1).code, 16);
        assert_eq!(index.lookup(1, 2), NOT_MATCHED);
    }

    #[test]
    fn test_customized_cell() {
        let table = fixture().build_table().unwrap();
        let cell = table
            .cells()
            .iter()
            .find(|c| c.row == 2 && c.column == 1)
            .unwrap();
        assert_eq!(cell.to_html(), "<p><em>custom</em></p>");
    }

    #[test]
    fn test_unknown_row_is_blank() {
        let mut table = fixture();
        table.rows.push(EvaluationRow {
            id: 99,
            customized: Vec::new(),
        });
        let built = table.build_table().unwrap();
        assert_eq!(built.rows(), 4);
        assert!(built
            .cells()
            .iter()
            .filter(|c| c.row == 3)
            .all(|c| c.content == CellContent::default()));
    }

    #[test]
    fn test_subheaders() {
        let mut table = fixture();
        table.subheaders = vec![Subheader {
            label: "Domains".to_string(),
            start: 2,
            length: 2,
        }];
        let built = table.build_table().unwrap();
        assert_eq!(built.rows(), 4);

        let first_row: Vec<_> = built
            .cells()
            .iter()
            .filter(|c| c.row == 0)
            .map(|c| (c.column, c.col_span, c.to_html()))
            .collect();
        assert_eq!(
            first_row,
            vec![
                (0, 1, String::new()),
                (1, 1, String::new()),
                (2, 2, "<p>Domains</p>".to_string()),
            ]
        );
        // data shifted below both header rows
        assert_eq!(token_at(&built, 2, 2).symbol, "++");
    }

    #[test]
    fn test_overlapping_subheaders_fail() {
        let mut table = fixture();
        table.subheaders = vec![
            Subheader {
                label: "A".to_string(),
                start: 0,
                length: 2,
            },
            Subheader {
                label: "B".to_string(),
                start: 1,
                length: 2,
            },
        ];
        let err = table.build_table().unwrap_err();
        assert!(matches!(err.as_layout(), Some(LayoutError::CellOverlap { .. })));
    }

    #[test]
    fn test_subheader_length_saturates() {
        let mut table = fixture();
        table.subheaders = vec![Subheader {
            label: "A".to_string(),
            start: 1,
            length: usize::MAX,
        }];
        let err = table.build_table().unwrap_err();
        assert!(matches!(
            err.as_layout(),
            Some(LayoutError::OutOfBounds { row: 0, .. })
        ));
    }

    #[test]
    fn test_subheader_past_last_column_fails() {
        let mut table = fixture();
        table.subheaders = vec![Subheader {
            label: "A".to_string(),
            start: 3,
            length: 2,
        }];
        let err = table.build_table().unwrap_err();
        assert!(matches!(err.as_layout(), Some(LayoutError::OutOfBounds { .. })));
    }

    #[test]
    fn test_render_shades_scores() {
        let doc = fixture().to_docx(None, &RenderOptions::default()).unwrap();
        let native = doc.tables().next().unwrap();
        assert_eq!(native.cell(1, 2).unwrap().shade.as_deref(), Some("00CC00"));
        assert_eq!(native.cell(1, 2).unwrap().text(), "++");
        assert_eq!(native.cell(0, 0).unwrap().shade.as_deref(), Some("EEEEEE"));
    }

    #[test]
    fn test_deserialize() {
        let table: StudyEvaluationTable = serde_json::from_str(
            r#"{
                "rows": [{"id": 1}],
                "columns": [{"attribute": "rob", "metric_id": 3, "key": "k", "label": "Metric"}],
                "data": {"rows": [{"id": 1, "study_id": 4}], "scores": [{"study_id": 4, "metric_id": 3, "score": 16}]}
            }"#,
        )
        .unwrap();
        let built = table.build_table().unwrap();
        assert_eq!(token_at(&built, 1, 0).symbol, "+");
    }
}
