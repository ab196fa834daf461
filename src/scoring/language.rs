use std::collections::HashSet;

use super::result::{round_to, Criterion, Evaluation};
use super::rubric::LanguageRubric;
use crate::error::RubricError;
use crate::services::GrammarChecker;

/// Grammar points: full marks with no errors, zero at the error ceiling.
/// `total_words` must be positive.
pub fn grammar_points(error_count: usize, total_words: usize, rubric: &LanguageRubric) -> f64 {
    let errors_per_100 = error_count as f64 / total_words as f64 * 100.0;
    (1.0 - (errors_per_100 / rubric.error_ceiling_per_100).min(1.0)) * rubric.grammar_points
}

/// Unique lowercased words over total words. `words` must be non-empty.
pub fn type_token_ratio(words: &[String]) -> f64 {
    let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    unique.len() as f64 / words.len() as f64
}

/// Normalize grammar plus vocabulary points onto the criterion weight.
pub fn language_score(grammar: f64, vocabulary: f64, rubric: &LanguageRubric) -> f64 {
    (grammar + vocabulary) / (rubric.grammar_points + rubric.vocabulary_points()) * rubric.weight
}

pub async fn evaluate_language(
    transcript: &str,
    words: &[String],
    rubric: &LanguageRubric,
    grammar: &dyn GrammarChecker,
) -> Result<Evaluation, RubricError> {
    let matches = grammar
        .check(transcript)
        .await
        .map_err(|e| RubricError::collaborator(grammar.name(), e))?;
    let error_count = matches.len();

    let grammar_raw = grammar_points(error_count, words.len(), rubric);
    let ttr = type_token_ratio(words);
    let vocabulary_raw = rubric.vocabulary.score(ttr);
    let score = language_score(grammar_raw, vocabulary_raw, rubric);
    tracing::debug!(error_count, grammar_raw, ttr, vocabulary_raw, "language scored");

    let feedback = format!("TTR: {:?}, Grammar Errors: {}", round_to(ttr, 2), error_count);
    Ok(Evaluation::new(Criterion::Language, score, feedback))
}
