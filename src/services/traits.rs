//! Contracts for the inference services the rubric engine consumes.
//!
//! Implementations are constructed once at startup and shared across
//! concurrent requests, so every method takes `&self` and must be free of
//! per-request mutable state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::similarity::cosine_similarity_matrix;
use crate::error::ServiceResult;

/// Sentence embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Service name for logs and errors
    fn name(&self) -> &'static str;

    /// Encode texts into vectors of identical dimensionality, one per input, in input order.
    async fn encode(&self, texts: &[String]) -> ServiceResult<Vec<Vec<f32>>>;

    /// Pairwise cosine similarity; row `i` holds `a[i]` against every vector of `b`.
    fn cosine_similarity(&self, a: &[Vec<f32>], b: &[Vec<f32>]) -> ServiceResult<Vec<Vec<f32>>> {
        cosine_similarity_matrix(a, b)
    }
}

/// A single issue reported by the grammar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarMatch {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    pub rule_id: Option<String>,
}

/// Grammar and spelling checker. Scoring only consumes the number of matches.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self, text: &str) -> ServiceResult<Vec<GrammarMatch>>;
}

/// VADER-style polarity scores. `compound` lies in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub compound: f64,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub neu: f64,
    #[serde(default)]
    pub neg: f64,
}

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn polarity_scores(&self, text: &str) -> ServiceResult<PolarityScores>;
}
