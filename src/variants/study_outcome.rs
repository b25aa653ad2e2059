//! Endpoints with their doses and effect levels

use serde::{Deserialize, Serialize};

use super::TableVariant;
use crate::core::{Cell, CellGroup, Table};
use crate::utils::error::TableResult;

/// Shown for a missing effect level
const NO_VALUE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeAttribute {
    Study,
    Experiment,
    AnimalGroup,
    Endpoint,
    System,
    Doses,
    Noel,
    Loel,
}

impl OutcomeAttribute {
    pub fn default_label(&self) -> &'static str {
        match self {
            OutcomeAttribute::Study => "Study",
            OutcomeAttribute::Experiment => "Experiment",
            OutcomeAttribute::AnimalGroup => "Animal group",
            OutcomeAttribute::Endpoint => "Endpoint",
            OutcomeAttribute::System => "System",
            OutcomeAttribute::Doses => "Doses",
            OutcomeAttribute::Noel => "NOEL",
            OutcomeAttribute::Loel => "LOEL",
        }
    }

    /// Attributes that describe a grouping level rather than a single endpoint
    fn groups_rows(&self) -> bool {
        matches!(
            self,
            OutcomeAttribute::Study
                | OutcomeAttribute::Experiment
                | OutcomeAttribute::AnimalGroup
                | OutcomeAttribute::System
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeColumn {
    pub attribute: OutcomeAttribute,
    /// Header text; the attribute's default label when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

impl OutcomeColumn {
    fn header(&self) -> &str {
        if self.label.is_empty() {
            self.attribute.default_label()
        } else {
            &self.label
        }
    }
}

/// One endpoint with its dose groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointRecord {
    pub study: String,
    pub experiment: String,
    pub animal_group: String,
    pub endpoint: String,
    pub system: String,
    /// Dose of every dose group, as displayed
    pub doses: Vec<String>,
    pub dose_units: String,
    /// Dose-group index of the no-observed-effect level
    pub noel: Option<usize>,
    /// Dose-group index of the lowest-observed-effect level
    pub loel: Option<usize>,
}

impl EndpointRecord {
    fn with_units(&self, value: &str) -> String {
        if self.dose_units.is_empty() {
            value.to_string()
        } else {
            format!("{} {}", value, self.dose_units)
        }
    }

    fn effect_level(&self, index: Option<usize>) -> String {
        match index.and_then(|i| self.doses.get(i)) {
            Some(dose) => self.with_units(dose),
            None => NO_VALUE.to_string(),
        }
    }

    /// Display value of an attribute
    pub fn value(&self, attribute: OutcomeAttribute) -> String {
        match attribute {
            OutcomeAttribute::Study => self.study.clone(),
            OutcomeAttribute::Experiment => self.experiment.clone(),
            OutcomeAttribute::AnimalGroup => self.animal_group.clone(),
            OutcomeAttribute::Endpoint => self.endpoint.clone(),
            OutcomeAttribute::System => self.system.clone(),
            OutcomeAttribute::Doses if self.doses.is_empty() => NO_VALUE.to_string(),
            OutcomeAttribute::Doses => self.with_units(&self.doses.join(", ")),
            OutcomeAttribute::Noel => self.effect_level(self.noel),
            OutcomeAttribute::Loel => self.effect_level(self.loel),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyOutcomeTable {
    pub columns: Vec<OutcomeColumn>,
    #[serde(default)]
    pub rows: Vec<EndpointRecord>,
    /// Merge leading grouping columns whose values repeat down the table
    #[serde(default)]
    pub merge_repeated: bool,
}

impl StudyOutcomeTable {
    /// Number of leading columns eligible for merging
    fn mergeable_columns(&self) -> usize {
        if !self.merge_repeated {
            return 0;
        }
        self.columns
            .iter()
            .take_while(|c| c.attribute.groups_rows())
            .count()
    }

    fn data_group(&self) -> CellGroup {
        let values: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| self.columns.iter().map(|c| r.value(c.attribute)).collect())
            .collect();
        let merged = self.mergeable_columns();

        let mut group = CellGroup::default();
        for column in 0..self.columns.len() {
            if column >= merged {
                for (row, row_values) in values.iter().enumerate() {
                    group.push(Cell::text(row, column, &row_values[column]));
                }
                continue;
            }
            // a run continues while every column up to this one repeats, so
            // inner merges never cross an outer boundary
            let mut start = 0;
            while start < values.len() {
                let key = &values[start][..=column];
                let length = values[start..]
                    .iter()
                    .take_while(|v| &v[..=column] == key)
                    .count();
                group.push(Cell::text(start, column, &values[start][column]).with_span(length, 1));
                start += length;
            }
        }
        group
    }
}

impl TableVariant for StudyOutcomeTable {
    fn build_default() -> Self {
        let column = |attribute| OutcomeColumn {
            attribute,
            label: String::new(),
        };
        StudyOutcomeTable {
            columns: vec![
                column(OutcomeAttribute::Study),
                column(OutcomeAttribute::AnimalGroup),
                column(OutcomeAttribute::Endpoint),
                column(OutcomeAttribute::Doses),
                column(OutcomeAttribute::Noel),
                column(OutcomeAttribute::Loel),
            ],
            rows: Vec::new(),
            merge_repeated: true,
        }
    }

    fn build_table(&self) -> TableResult<Table> {
        let mut layout: CellGroup = self
            .columns
            .iter()
            .enumerate()
            .map(|(column, c)| Cell::header_text(0, column, c.header()))
            .collect();
        layout.merge(self.data_group().offset(1, 0));
        Ok(Table::new(layout.cells)?)
    }
}
