//! Data layer - Static vocabularies
//!
//! This module contains the process-wide lookup tables:
//! - Rich-text tag vocabulary (tag -> paragraph style / run formatting)
//! - Judgement, certainty factor and risk-of-bias score codes

pub mod judgements;
pub mod tags;

// Re-export commonly used items
pub use judgements::{
    ept_judgement, factor_label, rob_score, summary_judgement, FactorDirection, JudgementLevel,
    RobScore, CUSTOM, EPT_JUDGEMENTS, NOT_ASSESSED, NOT_MATCHED, ROB_SCORES, SUMMARY_JUDGEMENTS,
};
pub use tags::{InlineTag, ListKind, BLOCK_STYLES, INLINE_TAGS};
