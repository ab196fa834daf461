use super::result::{round_to, Criterion, Evaluation};
use super::rubric::BandedCriterion;

/// Words per minute; zero when the duration is not positive.
pub fn words_per_minute(total_words: usize, duration_seconds: f64) -> f64 {
    if duration_seconds > 0.0 {
        total_words as f64 / duration_seconds * 60.0
    } else {
        0.0
    }
}

pub fn evaluate_speech_rate(total_words: usize, duration_seconds: f64, rubric: &BandedCriterion) -> Evaluation {
    let wpm = words_per_minute(total_words, duration_seconds);
    let score = rubric.bands.score(wpm);
    tracing::debug!(wpm, score, "speech rate scored");

    Evaluation::new(Criterion::SpeechRate, score, format!("{} WPM", round_to(wpm, 0) as i64))
}
