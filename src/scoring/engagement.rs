use super::result::{round_to, Criterion, Evaluation};
use super::rubric::BandedCriterion;
use crate::error::{RubricError, ServiceError};
use crate::services::SentimentAnalyzer;

/// Map a compound polarity in [-1, 1] onto [0, 1].
pub fn normalize_compound(compound: f64) -> Result<f64, ServiceError> {
    if !compound.is_finite() || !(-1.0..=1.0).contains(&compound) {
        return Err(ServiceError::Malformed(format!(
            "compound score {} is outside [-1, 1]",
            compound
        )));
    }
    Ok((compound + 1.0) / 2.0)
}

pub async fn evaluate_engagement(
    transcript: &str,
    rubric: &BandedCriterion,
    sentiment: &dyn SentimentAnalyzer,
) -> Result<Evaluation, RubricError> {
    let service = sentiment.name();
    let scores = sentiment
        .polarity_scores(transcript)
        .await
        .map_err(|e| RubricError::collaborator(service, e))?;
    let metric = normalize_compound(scores.compound).map_err(|e| RubricError::collaborator(service, e))?;
    let score = rubric.bands.score(metric);
    tracing::debug!(compound = scores.compound, metric, score, "engagement scored");

    Ok(Evaluation::new(
        Criterion::Engagement,
        score,
        format!("Positivity: {:?}", round_to(metric, 2)),
    ))
}
