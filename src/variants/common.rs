//! Pieces shared by the evidence tables

use serde::{Deserialize, Serialize};

use crate::core::JudgementToken;
use crate::data::judgements::{
    ept_judgement, summary_judgement, JudgementLevel, CUSTOM, NOT_ASSESSED,
};

/// An authored judgement: a code, an optional custom label and a rationale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub judgement: i32,
    /// Replaces the vocabulary label (required for custom judgements)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_label: String,
    /// Rich-text rationale
    #[serde(default)]
    pub description: String,
}

impl Default for Judgement {
    fn default() -> Self {
        Judgement {
            judgement: NOT_ASSESSED,
            custom_label: String::new(),
            description: String::new(),
        }
    }
}

impl Judgement {
    /// Token for an evidence-stream judgement
    pub fn stream_token(&self) -> JudgementToken {
        self.token(ept_judgement(self.judgement))
    }

    /// Token for a summary (integrated) judgement
    pub fn summary_token(&self) -> JudgementToken {
        self.token(summary_judgement(self.judgement))
    }

    fn token(&self, level: Option<&JudgementLevel>) -> JudgementToken {
        let (symbol, label) = match level {
            Some(level) if level.code == CUSTOM || !self.custom_label.is_empty() => {
                (level.symbol, self.custom_label.as_str())
            }
            Some(level) => (level.symbol, level.label),
            None => {
                log::warn!("unknown judgement code {}", self.judgement);
                ("", self.custom_label.as_str())
            }
        };
        JudgementToken::new(self.judgement, symbol, label).with_description(self.description.clone())
    }
}

/// Split `total` twips proportionally to `weights`
///
/// The last column absorbs rounding so the widths always sum to `total`.
pub fn relative_widths(weights: &[u32], total: u32) -> Vec<u32> {
    let sum: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if weights.is_empty() || sum == 0 {
        return Vec::new();
    }
    let mut widths: Vec<u32> = weights
        .iter()
        .map(|&w| (u64::from(total) * u64::from(w) / sum) as u32)
        .collect();
    let assigned: u32 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += total - assigned;
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_token() {
        let token = Judgement {
            judgement: 20,
            custom_label: String::new(),
            description: "<p>consistent</p>".to_string(),
        }
        .stream_token();
        assert_eq!(token.symbol, "⊕⊕⊙");
        assert_eq!(token.label, "Moderate");
        assert_eq!(token.description, "<p>consistent</p>");
    }

    #[test]
    fn test_custom_label_wins() {
        let judgement = Judgement {
            judgement: CUSTOM,
            custom_label: "Plausible".to_string(),
            description: String::new(),
        };
        assert_eq!(judgement.summary_token().label, "Plausible");

        let relabeled = Judgement {
            judgement: 30,
            custom_label: "Strong".to_string(),
            description: String::new(),
        };
        let token = relabeled.summary_token();
        assert_eq!((token.symbol.as_str(), token.label.as_str()), ("⊕⊕⊕", "Strong"));
    }

    #[test]
    fn test_default_is_not_assessed() {
        let token = Judgement::default().summary_token();
        assert_eq!(token.symbol, "");
        assert_eq!(token.label, "Not yet assessed");
    }

    #[test]
    fn test_unknown_code() {
        let token = Judgement {
            judgement: 7,
            ..Judgement::default()
        }
        .stream_token();
        assert_eq!(token.symbol, "");
        assert_eq!(token.label, "");
    }

    #[test]
    fn test_relative_widths() {
        assert_eq!(relative_widths(&[1, 1, 2], 1000), vec![250, 250, 500]);
        assert_eq!(relative_widths(&[1, 1, 1], 1000), vec![333, 333, 334]);
        assert!(relative_widths(&[0, 0], 1000).is_empty());
        assert!(relative_widths(&[], 1000).is_empty());
    }
}
