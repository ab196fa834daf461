use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::config::GrammarConfig;
use super::read_json;
use super::traits::{GrammarChecker, GrammarMatch};
use crate::error::ServiceResult;

/// Client for a LanguageTool server (`POST /v2/check`).
pub struct LanguageToolChecker {
    http_client: Client,
    url: String,
    language: String,
}

impl LanguageToolChecker {
    pub fn new(http_client: Client, config: &GrammarConfig) -> Self {
        Self {
            http_client,
            url: config.url.clone(),
            language: config.language.clone(),
        }
    }
}

#[derive(Deserialize)]
struct CheckResponse {
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    #[serde(default)]
    message: String,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    length: usize,
    rule: Option<WireRule>,
}

#[derive(Deserialize)]
struct WireRule {
    id: String,
}

impl From<WireMatch> for GrammarMatch {
    fn from(m: WireMatch) -> Self {
        Self {
            message: m.message,
            offset: m.offset,
            length: m.length,
            rule_id: m.rule.map(|r| r.id),
        }
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolChecker {
    fn name(&self) -> &'static str {
        "grammar"
    }

    async fn check(&self, text: &str) -> ServiceResult<Vec<GrammarMatch>> {
        let response = self
            .http_client
            .post(&self.url)
            .form(&[("language", self.language.as_str()), ("text", text)])
            .send()
            .await?;
        let body: CheckResponse = read_json(response).await?;

        tracing::debug!(matches = body.matches.len(), "grammar check complete");
        Ok(body.matches.into_iter().map(GrammarMatch::from).collect())
    }
}
