use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::config::EmbedderConfig;
use super::read_json;
use super::traits::Embedder;
use crate::error::{ServiceError, ServiceResult};

/// Client for an OpenAI-compatible `/v1/embeddings` endpoint
/// (text-embeddings-inference, vLLM, llama.cpp server, ...).
pub struct HttpEmbedder {
    http_client: Client,
    url: String,
    model: String,
}

impl HttpEmbedder {
    pub fn new(http_client: Client, config: &EmbedderConfig) -> Self {
        Self {
            http_client,
            url: config.url.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Put vectors back in input order and check count and dimensionality.
fn into_ordered_vectors(mut data: Vec<EmbeddingData>, expected: usize) -> ServiceResult<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(ServiceError::Malformed(format!(
            "expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(ServiceError::Malformed(
            "embedding indices are not a permutation of the inputs".to_string(),
        ));
    }

    let dimension = data[0].embedding.len();
    if dimension == 0 {
        return Err(ServiceError::Malformed("empty embedding vector".to_string()));
    }
    if let Some(bad) = data.iter().find(|d| d.embedding.len() != dimension) {
        return Err(ServiceError::DimensionMismatch {
            expected: dimension,
            actual: bad.embedding.len(),
        });
    }

    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &'static str {
        "embedder"
    }

    async fn encode(&self, texts: &[String]) -> ServiceResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await?;
        let body: EmbeddingResponse = read_json(response).await?;

        tracing::debug!(count = texts.len(), model = %self.model, "encoded texts");
        into_ordered_vectors(body.data, texts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<EmbeddingData> {
        serde_json::from_str::<EmbeddingResponse>(json).unwrap().data
    }

    #[test]
    fn test_reorders_by_index() {
        let data = parse(
            r#"{"object": "list", "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ], "model": "m"}"#,
        );
        let vectors = into_ordered_vectors(data, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_count_mismatch() {
        let data = parse(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#);
        assert!(matches!(
            into_ordered_vectors(data, 2),
            Err(ServiceError::Malformed(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let data = parse(
            r#"{"data": [
                {"index": 0, "embedding": [1.0, 0.0]},
                {"index": 1, "embedding": [1.0]}
            ]}"#,
        );
        assert!(matches!(
            into_ordered_vectors(data, 2),
            Err(ServiceError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_duplicate_index() {
        let data = parse(
            r#"{"data": [
                {"index": 0, "embedding": [1.0]},
                {"index": 0, "embedding": [1.0]}
            ]}"#,
        );
        assert!(into_ordered_vectors(data, 2).is_err());
    }

    #[tokio::test]
    async fn test_encode_empty_skips_request() {
        let embedder = HttpEmbedder::new(
            Client::new(),
            &EmbedderConfig {
                url: "http://127.0.0.1:9/unused".to_string(),
                model: "m".to_string(),
            },
        );
        assert!(embedder.encode(&[]).await.unwrap().is_empty());
    }
}
