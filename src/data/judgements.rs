//! Judgement and risk-of-bias vocabularies
//!
//! Evidence-profile judgements, summary judgements, certainty factors and
//! risk-of-bias scores are all stored as integer codes. These tables map the
//! codes to what a rendered cell shows.

use std::fmt;

/// Code of a judgement that has not been made yet
pub const NOT_ASSESSED: i32 = 900;
/// Code of a judgement whose text is supplied by the author
pub const CUSTOM: i32 = 910;

/// A judgement level of an evidence stream or a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgementLevel {
    pub code: i32,
    pub symbol: &'static str,
    pub label: &'static str,
}

/// Evidence-stream judgements of evidence profile tables
pub static EPT_JUDGEMENTS: &[JudgementLevel] = &[
    JudgementLevel {
        code: 30,
        symbol: "⊕⊕⊕",
        label: "Robust",
    },
    JudgementLevel {
        code: 20,
        symbol: "⊕⊕⊙",
        label: "Moderate",
    },
    JudgementLevel {
        code: 10,
        symbol: "⊕⊙⊙",
        label: "Slight",
    },
    JudgementLevel {
        code: 0,
        symbol: "⊙⊙⊙",
        label: "Indeterminate",
    },
    JudgementLevel {
        code: -10,
        symbol: "⊝⊝⊝",
        label: "Compelling evidence of no effect",
    },
    JudgementLevel {
        code: NOT_ASSESSED,
        symbol: "",
        label: "Not yet assessed",
    },
    JudgementLevel {
        code: CUSTOM,
        symbol: "",
        label: "Custom",
    },
];

/// Summary (integrated) judgements
pub static SUMMARY_JUDGEMENTS: &[JudgementLevel] = &[
    JudgementLevel {
        code: 30,
        symbol: "⊕⊕⊕",
        label: "Evidence demonstrates",
    },
    JudgementLevel {
        code: 20,
        symbol: "⊕⊕⊙",
        label: "Evidence indicates (likely)",
    },
    JudgementLevel {
        code: 10,
        symbol: "⊕⊙⊙",
        label: "Evidence suggests",
    },
    JudgementLevel {
        code: 0,
        symbol: "⊙⊙⊙",
        label: "Evidence inadequate",
    },
    JudgementLevel {
        code: -10,
        symbol: "⊝⊝⊝",
        label: "Strong evidence supports no effect",
    },
    JudgementLevel {
        code: NOT_ASSESSED,
        symbol: "",
        label: "Not yet assessed",
    },
    JudgementLevel {
        code: CUSTOM,
        symbol: "",
        label: "Custom",
    },
];

pub fn ept_judgement(code: i32) -> Option<&'static JudgementLevel> {
    EPT_JUDGEMENTS.iter().find(|j| j.code == code)
}

pub fn summary_judgement(code: i32) -> Option<&'static JudgementLevel> {
    SUMMARY_JUDGEMENTS.iter().find(|j| j.code == code)
}

/// Direction a certainty factor moves confidence in a stream judgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorDirection {
    Increase,
    Decrease,
}

impl fmt::Display for FactorDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorDirection::Increase => write!(f, "Factors that increase certainty"),
            FactorDirection::Decrease => write!(f, "Factors that decrease certainty"),
        }
    }
}

static INCREASE_FACTORS: &[(i32, &str)] = &[
    (10, "No factors noted"),
    (20, "Consistency"),
    (30, "Dose-response gradient"),
    (40, "Coherence of effects"),
    (50, "Large or concerning magnitude of effect"),
    (60, "Mechanistic evidence providing plausibility"),
    (70, "Medium or high confidence studies"),
    (80, "Other"),
];

static DECREASE_FACTORS: &[(i32, &str)] = &[
    (10, "No factors noted"),
    (20, "Unexplained inconsistency"),
    (30, "Imprecision"),
    (40, "Low confidence studies"),
    (50, "Evidence demonstrating implausibility"),
    (60, "Interpretation limitations"),
    (70, "Other"),
];

/// Label of a certainty factor code
pub fn factor_label(direction: FactorDirection, code: i32) -> Option<&'static str> {
    let table = match direction {
        FactorDirection::Increase => INCREASE_FACTORS,
        FactorDirection::Decrease => DECREASE_FACTORS,
    };
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Display attributes of a risk-of-bias score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobScore {
    pub code: i32,
    pub symbol: &'static str,
    pub label: &'static str,
    pub shade: &'static str,
}

/// Shown where a study has no score for a metric
pub const NOT_MATCHED: RobScore = RobScore {
    code: -1,
    symbol: "NM",
    label: "N/A",
    shade: "#DFDFDF",
};

macro_rules! rob {
    ($code:expr, $symbol:expr, $label:expr, $shade:expr) => {
        RobScore {
            code: $code,
            symbol: $symbol,
            label: $label,
            shade: $shade,
        }
    };
}

pub static ROB_SCORES: &[RobScore] = &[
    rob!(0, "NR", "Not reported", "#FFCC00"),
    rob!(10, "NA", "Not applicable", "#E8E8E8"),
    // study quality
    rob!(1, "--", "Critically deficient", "#CC3333"),
    rob!(2, "-", "Poor", "#FFCC00"),
    rob!(3, "+", "Adequate", "#6FFF6F"),
    rob!(4, "++", "Good", "#00CC00"),
    // risk of bias
    rob!(14, "--", "Definitely high risk of bias", "#CC3333"),
    rob!(15, "-", "Probably high risk of bias", "#FFCC00"),
    rob!(16, "+", "Probably low risk of bias", "#6FFF6F"),
    rob!(17, "++", "Definitely low risk of bias", "#00CC00"),
    // overall confidence
    rob!(20, "NR", "Not reported", "#FFCC00"),
    rob!(21, "--", "Critically deficient", "#CC3333"),
    rob!(22, "-", "Low", "#FFCC00"),
    rob!(23, "+", "Medium", "#6FFF6F"),
    rob!(24, "++", "High", "#00CC00"),
    rob!(25, "NA", "Not applicable", "#E8E8E8"),
];

pub fn rob_score(code: i32) -> Option<&'static RobScore> {
    ROB_SCORES.iter().find(|s| s.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judgement_lookup() {
        assert_eq!(ept_judgement(20).unwrap().symbol, "⊕⊕⊙");
        assert_eq!(ept_judgement(-10).unwrap().label, "Compelling evidence of no effect");
        assert_eq!(summary_judgement(20).unwrap().label, "Evidence indicates (likely)");
        assert_eq!(summary_judgement(NOT_ASSESSED).unwrap().symbol, "");
        assert!(ept_judgement(5).is_none());
    }

    #[test]
    fn test_codes_unique() {
        for table in [EPT_JUDGEMENTS, SUMMARY_JUDGEMENTS] {
            for (i, a) in table.iter().enumerate() {
                assert!(table[i + 1..].iter().all(|b| b.code != a.code));
            }
        }
        for (i, a) in ROB_SCORES.iter().enumerate() {
            assert!(ROB_SCORES[i + 1..].iter().all(|b| b.code != a.code));
        }
    }

    #[test]
    fn test_factor_labels() {
        assert_eq!(
            factor_label(FactorDirection::Increase, 30),
            Some("Dose-response gradient")
        );
        assert_eq!(factor_label(FactorDirection::Decrease, 30), Some("Imprecision"));
        assert_eq!(factor_label(FactorDirection::Decrease, 80), None);
    }

    #[test]
    fn test_rob_scores() {
        let score = rob_score(17).unwrap();
        assert_eq!(score.symbol, "++");
        assert_eq!(score.shade, "#00CC00");
        assert!(rob_score(NOT_MATCHED.code).is_none());
    }
}
