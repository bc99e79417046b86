// PolicyScan Data Models
// Labels, per-paragraph verdicts and the validation report

use serde::{Deserialize, Serialize};

/// Dimension of the pretrained embedding space (GoogleNews word2vec).
pub const FEATURE_DIM: usize = 300;

/// Class value the pretrained classifier emits for a problematic paragraph.
/// Flipping this silently inverts every result.
pub const PROBLEM_CLASS: i64 = 0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Problem,
    Acceptable,
}

impl Label {
    /// Map a raw classifier class value onto a label.
    pub fn from_class(class: i64) -> Self {
        if class == PROBLEM_CLASS {
            Label::Problem
        } else {
            Label::Acceptable
        }
    }

    pub fn is_problem(self) -> bool {
        matches!(self, Label::Problem)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphVerdict {
    pub index: usize,
    pub text: String,
    pub label: Label,
    pub token_count: usize,
    pub oov_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Original text, highlighted and `<br>`-rendered when problems exist.
    pub rendered: String,
    /// Problem paragraphs in document order, not deduplicated.
    pub problems: Vec<String>,
    #[serde(default)]
    pub paragraphs: Vec<ParagraphVerdict>,
}

impl ValidationReport {
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}
