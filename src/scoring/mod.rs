pub mod bands;
pub mod clarity;
pub mod config;
pub mod content;
pub mod engagement;
pub mod engine;
pub mod language;
pub mod result;
pub mod rubric;
pub mod speech;
pub mod validation;

pub use bands::{RangeOp, ScoreBands};
pub use config::*;
pub use engine::RubricScorer;
pub use result::{aggregate, round_to, Criterion, CriterionResult, Evaluation, RubricResult};
pub use rubric::{BandedCriterion, ClarityRubric, LanguageRubric, Rubric};
pub use validation::validate_rubric;
