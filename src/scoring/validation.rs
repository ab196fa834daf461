use super::bands::RangeOp;
use super::config::{Band, RubricConfig, SalutationTier, TopicSet};

const TOTAL_WEIGHT: f64 = 100.0;

fn check_positive(errors: &mut Vec<String>, path: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(format!("{}: must be greater than zero", path));
    }
}

fn check_non_negative(errors: &mut Vec<String>, path: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(format!("{}: must be non-negative", path));
    }
}

/// Every band must parse and award between 0 and `max` points.
fn check_bands(errors: &mut Vec<String>, path: &str, bands: &[Band], otherwise: f64, max: f64) {
    for (i, band) in bands.iter().enumerate() {
        if let Err(e) = RangeOp::parse(&band.range) {
            errors.push(format!(
                "{}.bands[{}].range: invalid '{}' - {}",
                path, i, band.range, e
            ));
        }
        if !(band.score >= 0.0 && band.score <= max) {
            errors.push(format!(
                "{}.bands[{}].score: {} is outside 0-{}",
                path, i, band.score, max
            ));
        }
    }
    if !(otherwise >= 0.0 && otherwise <= max) {
        errors.push(format!(
            "{}.otherwise: {} is outside 0-{}",
            path, otherwise, max
        ));
    }
}

fn check_salutations(errors: &mut Vec<String>, path: &str, tier: &SalutationTier) {
    check_non_negative(errors, &format!("{}.points", path), tier.points);
    if tier.phrases.iter().any(|p| p.trim().is_empty()) {
        errors.push(format!("{}.phrases: must not contain empty phrases", path));
    }
}

fn check_topics(errors: &mut Vec<String>, path: &str, set: &TopicSet) {
    check_non_negative(errors, &format!("{}.points_each", path), set.points_each);
    check_non_negative(errors, &format!("{}.cap", path), set.cap);
    if set.topics.iter().any(|t| t.trim().is_empty()) {
        errors.push(format!("{}.topics: must not contain empty labels", path));
    }
}

/// Validate rubric configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_rubric(config: &RubricConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Content & Structure
    let content = &config.content;
    check_positive(&mut errors, "rubric.content.weight", content.weight);
    check_positive(&mut errors, "rubric.content.raw_cap", content.raw_cap);
    if content.salutation_window == 0 {
        errors.push("rubric.content.salutation_window: must be greater than zero".to_string());
    }
    check_salutations(&mut errors, "rubric.content.strong_salutations", &content.strong_salutations);
    check_salutations(&mut errors, "rubric.content.weak_salutations", &content.weak_salutations);
    check_non_negative(&mut errors, "rubric.content.flow_points", content.flow_points);
    if !(-1.0..=1.0).contains(&content.topic_threshold) {
        errors.push(format!(
            "rubric.content.topic_threshold: {} is outside -1 to 1",
            content.topic_threshold
        ));
    }
    check_topics(&mut errors, "rubric.content.must_have", &content.must_have);
    check_topics(&mut errors, "rubric.content.good_to_have", &content.good_to_have);

    // Speech Rate
    let speech = &config.speech_rate;
    check_positive(&mut errors, "rubric.speech_rate.weight", speech.weight);
    check_bands(&mut errors, "rubric.speech_rate", &speech.bands, speech.otherwise, speech.weight);

    // Language
    let language = &config.language;
    check_positive(&mut errors, "rubric.language.weight", language.weight);
    check_positive(&mut errors, "rubric.language.error_ceiling_per_100", language.error_ceiling_per_100);
    if !(language.grammar_points >= 0.0 && language.grammar_points < language.weight) {
        errors.push(format!(
            "rubric.language.grammar_points: {} must be at least 0 and below the weight ({})",
            language.grammar_points, language.weight
        ));
    }
    let vocabulary_max = (language.weight - language.grammar_points).max(0.0);
    check_bands(
        &mut errors,
        "rubric.language.vocabulary",
        &language.vocabulary.bands,
        language.vocabulary.otherwise,
        vocabulary_max,
    );

    // Clarity
    let clarity = &config.clarity;
    check_positive(&mut errors, "rubric.clarity.weight", clarity.weight);
    if clarity.filler_words.iter().any(|w| w.trim().is_empty()) {
        errors.push("rubric.clarity.filler_words: must not contain empty words".to_string());
    }
    check_bands(&mut errors, "rubric.clarity", &clarity.bands, clarity.otherwise, clarity.weight);

    // Engagement
    let engagement = &config.engagement;
    check_positive(&mut errors, "rubric.engagement.weight", engagement.weight);
    check_bands(&mut errors, "rubric.engagement", &engagement.bands, engagement.otherwise, engagement.weight);

    let total = content.weight + speech.weight + language.weight + clarity.weight + engagement.weight;
    if (total - TOTAL_WEIGHT).abs() > 1e-9 {
        errors.push(format!("rubric: criterion weights must sum to 100, got {}", total));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
