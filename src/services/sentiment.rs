use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::config::SentimentConfig;
use super::read_json;
use super::traits::{PolarityScores, SentimentAnalyzer};
use crate::error::ServiceResult;

/// Client for a sentiment endpoint that answers `POST {"text": ...}` with
/// VADER-style `{"neg", "neu", "pos", "compound"}` scores.
pub struct HttpSentimentAnalyzer {
    http_client: Client,
    url: String,
}

impl HttpSentimentAnalyzer {
    pub fn new(http_client: Client, config: &SentimentConfig) -> Self {
        Self {
            http_client,
            url: config.url.clone(),
        }
    }
}

#[derive(Serialize)]
struct PolarityRequest<'a> {
    text: &'a str,
}

#[async_trait]
impl SentimentAnalyzer for HttpSentimentAnalyzer {
    fn name(&self) -> &'static str {
        "sentiment"
    }

    async fn polarity_scores(&self, text: &str) -> ServiceResult<PolarityScores> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&PolarityRequest { text })
            .send()
            .await?;
        let scores: PolarityScores = read_json(response).await?;

        tracing::debug!(compound = scores.compound, "sentiment scored");
        Ok(scores)
    }
}
