use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five rubric criteria. Declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criterion {
    #[serde(rename = "Content & Structure")]
    ContentStructure,
    #[serde(rename = "Speech Rate")]
    SpeechRate,
    Language,
    Clarity,
    Engagement,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::ContentStructure,
        Criterion::SpeechRate,
        Criterion::Language,
        Criterion::Clarity,
        Criterion::Engagement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Criterion::ContentStructure => "Content & Structure",
            Criterion::SpeechRate => "Speech Rate",
            Criterion::Language => "Language",
            Criterion::Clarity => "Clarity",
            Criterion::Engagement => "Engagement",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub score: f64,
    pub feedback: String,
}

/// Final scoring outcome for one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricResult {
    pub overall_score: f64,
    pub details: BTreeMap<Criterion, CriterionResult>,
}

impl RubricResult {
    pub fn get(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.details.get(&criterion)
    }
}

/// Unrounded weighted score produced by one evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub criterion: Criterion,
    pub score: f64,
    pub feedback: String,
}

impl Evaluation {
    pub fn new(criterion: Criterion, score: f64, feedback: String) -> Self {
        Self {
            criterion,
            score,
            feedback,
        }
    }
}

/// Round to `places` decimals, ties to even on the exact binary value.
///
/// Goes through precision formatting, which rounds the stored value rather
/// than `value * 10^places`, so `0.15` (stored just below) becomes `0.1`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let places = places.max(0) as usize;
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Join the per-criterion evaluations into the final result.
///
/// The overall score sums the unrounded sub-scores and rounds once; each
/// detail is rounded to one decimal on its own. Details are keyed by
/// [`Criterion`], so the output order never depends on the input order.
pub fn aggregate(evaluations: impl IntoIterator<Item = Evaluation>) -> RubricResult {
    let mut total = 0.0;
    let mut details = BTreeMap::new();

    for evaluation in evaluations {
        total += evaluation.score;
        details.insert(
            evaluation.criterion,
            CriterionResult {
                score: round_to(evaluation.score, 1),
                feedback: evaluation.feedback,
            },
        );
    }
    debug_assert_eq!(details.len(), Criterion::ALL.len());

    RubricResult {
        overall_score: round_to(total, 1),
        details,
    }
}
