//! Deterministic collaborator doubles for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::traits::{Embedder, GrammarChecker, GrammarMatch, PolarityScores, SentimentAnalyzer};
use crate::error::{ServiceError, ServiceResult};
use crate::text::Tokenizer;

/// Basis vector `e_i` of the given dimension.
pub fn unit(dimension: usize, i: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimension];
    v[i] = 1.0;
    v
}

/// Returns pre-built words and sentences regardless of the input text.
pub struct FixedTokenizer {
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

impl Tokenizer for FixedTokenizer {
    fn word_tokenize(&self, _text: &str) -> Vec<String> {
        self.words.clone()
    }

    fn sentence_tokenize(&self, _text: &str) -> Vec<String> {
        self.sentences.clone()
    }
}

/// Looks texts up in a table; unknown texts map to the last basis vector.
pub struct TableEmbedder {
    dimension: usize,
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            table: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for TableEmbedder {
    fn name(&self) -> &'static str {
        "embedder"
    }

    async fn encode(&self, texts: &[String]) -> ServiceResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                self.table
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| unit(self.dimension, self.dimension - 1))
            })
            .collect())
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn name(&self) -> &'static str {
        "embedder"
    }

    async fn encode(&self, _texts: &[String]) -> ServiceResult<Vec<Vec<f32>>> {
        Err(ServiceError::Api {
            status: 503,
            message: "model not loaded".to_string(),
        })
    }
}

fn grammar_match(i: usize) -> GrammarMatch {
    GrammarMatch {
        message: format!("issue {}", i),
        offset: i,
        length: 1,
        rule_id: None,
    }
}

/// Reports a fixed number of grammar issues.
pub struct FixedGrammar {
    errors: usize,
}

impl FixedGrammar {
    pub fn new(errors: usize) -> Self {
        Self { errors }
    }
}

#[async_trait]
impl GrammarChecker for FixedGrammar {
    fn name(&self) -> &'static str {
        "grammar"
    }

    async fn check(&self, _text: &str) -> ServiceResult<Vec<GrammarMatch>> {
        Ok((0..self.errors).map(grammar_match).collect())
    }
}

pub struct FailingGrammar;

#[async_trait]
impl GrammarChecker for FailingGrammar {
    fn name(&self) -> &'static str {
        "grammar"
    }

    async fn check(&self, _text: &str) -> ServiceResult<Vec<GrammarMatch>> {
        Err(ServiceError::Malformed("connection reset".to_string()))
    }
}

/// Fails the first `failures` calls, then reports no issues.
pub struct FlakyGrammar {
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyGrammar {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrammarChecker for FlakyGrammar {
    fn name(&self) -> &'static str {
        "grammar"
    }

    async fn check(&self, _text: &str) -> ServiceResult<Vec<GrammarMatch>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(ServiceError::Api {
                status: 503,
                message: "warming up".to_string(),
            })
        } else {
            Ok(Vec::new())
        }
    }
}

/// Returns a fixed compound score, optionally after a delay.
pub struct FixedSentiment {
    compound: f64,
    delay: Option<Duration>,
}

impl FixedSentiment {
    pub fn new(compound: f64) -> Self {
        Self {
            compound,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl SentimentAnalyzer for FixedSentiment {
    fn name(&self) -> &'static str {
        "sentiment"
    }

    async fn polarity_scores(&self, _text: &str) -> ServiceResult<PolarityScores> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(PolarityScores {
            compound: self.compound,
            pos: 0.0,
            neu: 0.0,
            neg: 0.0,
        })
    }
}
