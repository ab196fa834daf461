pub mod config;
pub mod embedder;
pub mod grammar;
pub mod sentiment;
pub mod similarity;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{validate_services, EmbedderConfig, GrammarConfig, SentimentConfig, ServicesConfig};
pub use embedder::HttpEmbedder;
pub use grammar::LanguageToolChecker;
pub use sentiment::HttpSentimentAnalyzer;
pub use similarity::{cosine_similarity, cosine_similarity_matrix};
pub use traits::{Embedder, GrammarChecker, GrammarMatch, PolarityScores, SentimentAnalyzer};

use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::error::{RubricError, ServiceError, ServiceResult};
use crate::text::{RuleTokenizer, Tokenizer};

const PROBE_RETRIES: usize = 3;
const PROBE_TEXT: &str = "Hello everyone.";

/// The external capabilities a scorer depends on. Built once at startup and
/// shared read-only across concurrent requests.
#[derive(Clone)]
pub struct Collaborators {
    pub tokenizer: Arc<dyn Tokenizer>,
    pub embedder: Arc<dyn Embedder>,
    pub grammar: Arc<dyn GrammarChecker>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
}

impl Collaborators {
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        embedder: Arc<dyn Embedder>,
        grammar: Arc<dyn GrammarChecker>,
        sentiment: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        Self {
            tokenizer,
            embedder,
            grammar,
            sentiment,
        }
    }

    /// Build the HTTP-backed services and probe each one.
    ///
    /// Any service that cannot be reached after a few attempts makes the
    /// whole startup fail; callers should treat the error as fatal.
    pub async fn connect(config: &ServicesConfig) -> Result<Self, RubricError> {
        let http_timeout = config
            .http_timeout()
            .map_err(|e| RubricError::unavailable("http client", ServiceError::Config(e.to_string())))?;
        let http_client = reqwest::Client::builder()
            .timeout(http_timeout)
            .user_agent(concat!("speech-rubric/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RubricError::unavailable("http client", ServiceError::Http(e)))?;

        let collaborators = Self::new(
            Arc::new(RuleTokenizer),
            Arc::new(HttpEmbedder::new(http_client.clone(), &config.embedder)),
            Arc::new(LanguageToolChecker::new(http_client.clone(), &config.grammar)),
            Arc::new(HttpSentimentAnalyzer::new(http_client, &config.sentiment)),
        );
        collaborators.probe().await?;
        Ok(collaborators)
    }

    /// Exercise every service once with a tiny input.
    pub async fn probe(&self) -> Result<(), RubricError> {
        let texts = vec![PROBE_TEXT.to_string()];
        tokio::try_join!(
            probe_service(self.embedder.name(), || self.embedder.encode(&texts)),
            probe_service(self.grammar.name(), || self.grammar.check(PROBE_TEXT)),
            probe_service(self.sentiment.name(), || self.sentiment.polarity_scores(PROBE_TEXT)),
        )?;
        tracing::info!("all collaborators reachable");
        Ok(())
    }
}

async fn probe_service<F, Fut, T>(name: &'static str, mut attempt: F) -> Result<(), RubricError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ServiceResult<T>>,
{
    // Exponential backoff: 10ms, 100ms, 1s between attempts
    let retry_strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(2))
        .take(PROBE_RETRIES);

    Retry::spawn(retry_strategy, || {
        let call = attempt();
        async move {
            call.await.map_err(|e| {
                tracing::warn!(service = name, error = %e, "startup probe failed");
                e
            })
        }
    })
    .await
    .map(|_| {
        tracing::debug!(service = name, "probe ok");
    })
    .map_err(|e| RubricError::unavailable(name, e))
}

/// Decode a JSON body, turning non-success statuses into [`ServiceError::Api`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ServiceResult<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn collaborators(grammar: Arc<dyn GrammarChecker>) -> Collaborators {
        Collaborators::new(
            Arc::new(RuleTokenizer),
            Arc::new(TableEmbedder::new(4)),
            grammar,
            Arc::new(FixedSentiment::new(0.5)),
        )
    }

    #[tokio::test]
    async fn test_probe_succeeds_with_healthy_services() {
        let c = collaborators(Arc::new(FixedGrammar::new(0)));
        assert!(c.probe().await.is_ok());
    }

    #[tokio::test]
    async fn test_probe_reports_unavailable_service() {
        let c = collaborators(Arc::new(FailingGrammar));
        let err = c.probe().await.unwrap_err();
        assert!(matches!(
            err,
            RubricError::CollaboratorUnavailable { service: "grammar", .. }
        ));
    }

    #[tokio::test]
    async fn test_probe_retries_transient_failure() {
        let grammar = Arc::new(FlakyGrammar::new(2));
        let c = collaborators(grammar.clone());
        assert!(c.probe().await.is_ok());
        assert_eq!(grammar.calls(), 3);
    }
}
