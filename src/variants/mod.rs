//! Table variants
//!
//! Each variant is a declarative table description that resolves into a
//! [`CellGroup`](crate::core::CellGroup) and is then validated and rendered
//! by the generic [`Table`]. Descriptions are exchanged as JSON objects tagged
//! by `table_type`.
//!
//! # Module Structure
//!
//! - `generic`: free-form grid of rich-text cells
//! - `study_evaluation`: studies by risk-of-bias metrics
//! - `study_outcome`: endpoint rows with doses and effect levels
//! - `evidence_profile`: evidence streams, certainty factors and judgements
//! - `evidence_integration`: one row per stream plus an integrated judgement
//! - `common`: judgement payloads and width helpers shared by the above

pub mod common;
pub mod evidence_integration;
pub mod evidence_profile;
pub mod generic;
pub mod study_evaluation;
pub mod study_outcome;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{new_document, CellPreview, RenderOptions, Table};
use crate::docx::model::{Document, NativeTable};
use crate::utils::error::{TableError, TableResult};

pub use evidence_integration::EvidenceIntegrationTable;
pub use evidence_profile::EvidenceProfileTable;
pub use generic::GenericTable;
pub use study_evaluation::StudyEvaluationTable;
pub use study_outcome::StudyOutcomeTable;

/// Behavior shared by every table variant
///
/// `to_docx` is a template: the variant builds its table, the generic
/// renderer realizes it, then `post_render` may adjust the native table.
pub trait TableVariant {
    /// A starter description for a new table of this kind
    fn build_default() -> Self
    where
        Self: Sized;

    /// Resolve the description into a validated table
    fn build_table(&self) -> TableResult<Table>;

    /// Whether the table needs a landscape page
    fn landscape(&self) -> bool {
        false
    }

    /// Adjust the rendered native table
    fn post_render(&self, _native: &mut NativeTable, _opts: &RenderOptions) {}

    fn to_docx(&self, doc: Option<Document>, opts: &RenderOptions) -> TableResult<Document> {
        let table = self.build_table()?;
        let mut doc = doc.unwrap_or_else(|| new_document(opts));
        let index = table.render_into(&mut doc, opts);
        if let Some(native) = doc.body.table_at_mut(index) {
            self.post_render(native, opts);
        }
        if self.landscape() {
            doc.landscape = true;
        }
        Ok(doc)
    }

    fn to_dict(&self) -> TableResult<Vec<CellPreview>> {
        Ok(self.build_table()?.to_dict())
    }
}

/// Kind of table variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Generic,
    EvidenceIntegration,
    EvidenceProfile,
    StudyEvaluation,
    StudyOutcome,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Generic,
        TableKind::EvidenceIntegration,
        TableKind::EvidenceProfile,
        TableKind::StudyEvaluation,
        TableKind::StudyOutcome,
    ];

    /// Value of the `table_type` tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Generic => "generic",
            TableKind::EvidenceIntegration => "evidence_integration",
            TableKind::EvidenceProfile => "evidence_profile",
            TableKind::StudyEvaluation => "study_evaluation",
            TableKind::StudyOutcome => "study_outcome",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| TableError::invalid(format!("unknown table type '{}'", s)))
    }
}

/// A table description of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table_type", rename_all = "snake_case")]
pub enum TableDescription {
    Generic(GenericTable),
    EvidenceIntegration(EvidenceIntegrationTable),
    EvidenceProfile(EvidenceProfileTable),
    StudyEvaluation(StudyEvaluationTable),
    StudyOutcome(StudyOutcomeTable),
}

impl TableDescription {
    /// Starter description of the given kind
    pub fn build_default(kind: TableKind) -> Self {
        match kind {
            TableKind::Generic => TableDescription::Generic(GenericTable::build_default()),
            TableKind::EvidenceIntegration => {
                TableDescription::EvidenceIntegration(EvidenceIntegrationTable::build_default())
            }
            TableKind::EvidenceProfile => {
                TableDescription::EvidenceProfile(EvidenceProfileTable::build_default())
            }
            TableKind::StudyEvaluation => {
                TableDescription::StudyEvaluation(StudyEvaluationTable::build_default())
            }
            TableKind::StudyOutcome => {
                TableDescription::StudyOutcome(StudyOutcomeTable::build_default())
            }
        }
    }

    pub fn kind(&self) -> TableKind {
        match self {
            TableDescription::Generic(_) => TableKind::Generic,
            TableDescription::EvidenceIntegration(_) => TableKind::EvidenceIntegration,
            TableDescription::EvidenceProfile(_) => TableKind::EvidenceProfile,
            TableDescription::StudyEvaluation(_) => TableKind::StudyEvaluation,
            TableDescription::StudyOutcome(_) => TableKind::StudyOutcome,
        }
    }

    /// The description as a trait object
    pub fn variant(&self) -> &dyn TableVariant {
        match self {
            TableDescription::Generic(t) => t,
            TableDescription::EvidenceIntegration(t) => t,
            TableDescription::EvidenceProfile(t) => t,
            TableDescription::StudyEvaluation(t) => t,
            TableDescription::StudyOutcome(t) => t,
        }
    }

    pub fn build_table(&self) -> TableResult<Table> {
        self.variant().build_table()
    }

    pub fn to_docx(&self, doc: Option<Document>, opts: &RenderOptions) -> TableResult<Document> {
        self.variant().to_docx(doc, opts)
    }

    pub fn to_dict(&self) -> TableResult<Vec<CellPreview>> {
        self.variant().to_dict()
    }

    /// Render straight to `.docx` bytes
    pub fn to_docx_bytes(&self, opts: &RenderOptions) -> TableResult<Vec<u8>> {
        self.to_docx(None, opts)?.to_bytes()
    }

    pub fn from_json(input: &str) -> TableResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> TableResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TableError::serialization(e.to_string()))
    }

    #[cfg(feature = "data-loading")]
    pub fn from_yaml(input: &str) -> TableResult<Self> {
        serde_yaml::from_str(input).map_err(|e| TableError::invalid(e.to_string()))
    }

    #[cfg(feature = "data-loading")]
    pub fn from_toml(input: &str) -> TableResult<Self> {
        toml::from_str(input).map_err(|e| TableError::invalid(e.to_string()))
    }

    /// Parse a description, picking the format from a file extension
    pub fn from_str_with_extension(input: &str, extension: Option<&str>) -> TableResult<Self> {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            #[cfg(feature = "data-loading")]
            Some("yaml") | Some("yml") => Self::from_yaml(input),
            #[cfg(feature = "data-loading")]
            Some("toml") => Self::from_toml(input),
            _ => Self::from_json(input),
        }
    }
}
