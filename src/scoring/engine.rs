use std::sync::Arc;
use std::time::Duration;

use super::clarity::evaluate_clarity;
use super::content::evaluate_content;
use super::engagement::evaluate_engagement;
use super::language::evaluate_language;
use super::result::{aggregate, RubricResult};
use super::rubric::Rubric;
use super::speech::evaluate_speech_rate;
use crate::error::RubricError;
use crate::services::Collaborators;

/// Scores transcripts against a compiled rubric.
///
/// Cheap to clone; the rubric and collaborators are shared.
#[derive(Clone)]
pub struct RubricScorer {
    rubric: Arc<Rubric>,
    collaborators: Collaborators,
    timeout: Option<Duration>,
}

impl RubricScorer {
    pub fn new(rubric: Rubric, collaborators: Collaborators) -> Self {
        Self {
            rubric: Arc::new(rubric),
            collaborators,
            timeout: None,
        }
    }

    /// Deadline for a whole `analyze` call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Score one transcript spoken over `duration_seconds`.
    ///
    /// Either all five criteria are scored or an error is returned; a
    /// collaborator failure or an expired deadline never yields a partial
    /// result.
    pub async fn analyze(&self, transcript: &str, duration_seconds: f64) -> Result<RubricResult, RubricError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.evaluate(transcript, duration_seconds))
                .await
                .map_err(|_| RubricError::TimedOut(limit))?,
            None => self.evaluate(transcript, duration_seconds).await,
        }
    }

    async fn evaluate(&self, transcript: &str, duration_seconds: f64) -> Result<RubricResult, RubricError> {
        let tokens = self.collaborators.tokenizer.tokenize(transcript);
        if tokens.is_empty() {
            return Err(RubricError::EmptyTranscript);
        }
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(RubricError::InvalidDuration(duration_seconds));
        }

        let rubric = &*self.rubric;
        let words = &tokens.words;
        let speech = evaluate_speech_rate(tokens.total_words(), duration_seconds, &rubric.speech_rate);
        let clarity = evaluate_clarity(words, &rubric.clarity);

        let (content, language, engagement) = tokio::try_join!(
            evaluate_content(
                transcript,
                &tokens.sentences,
                &rubric.content,
                self.collaborators.embedder.as_ref()
            ),
            evaluate_language(
                transcript,
                words,
                &rubric.language,
                self.collaborators.grammar.as_ref()
            ),
            evaluate_engagement(
                transcript,
                &rubric.engagement,
                self.collaborators.sentiment.as_ref()
            ),
        )?;

        let result = aggregate([content, speech, language, clarity, engagement]);
        tracing::info!(
            words = tokens.total_words(),
            sentences = tokens.sentences.len(),
            duration_seconds,
            overall = result.overall_score,
            "transcript scored"
        );
        Ok(result)
    }
}
