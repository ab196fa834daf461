use super::result::{round_to, Criterion, Evaluation};
use super::rubric::ClarityRubric;

pub fn filler_count(words: &[String], rubric: &ClarityRubric) -> usize {
    words
        .iter()
        .filter(|w| rubric.filler_words.contains(&w.to_lowercase()))
        .count()
}

/// Filler words per 100 words. `words` must be non-empty.
pub fn filler_rate(words: &[String], rubric: &ClarityRubric) -> f64 {
    filler_count(words, rubric) as f64 / words.len() as f64 * 100.0
}

pub fn evaluate_clarity(words: &[String], rubric: &ClarityRubric) -> Evaluation {
    let rate = filler_rate(words, rubric);
    let score = rubric.bands.score(rate);
    tracing::debug!(filler_rate = rate, score, "clarity scored");

    Evaluation::new(
        Criterion::Clarity,
        score,
        format!("Filler Rate: {:?}%", round_to(rate, 1)),
    )
}
