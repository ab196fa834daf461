use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the inference services live and how long requests may take.
///
/// Example YAML:
/// ```yaml
/// services:
///   timeout: "60s"
///   http_timeout: "30s"
///   embedder:
///     url: "http://localhost:8080/v1/embeddings"
///     model: "all-MiniLM-L6-v2"
///   grammar:
///     url: "http://localhost:8081/v2/check"
///     language: "en-US"
///   sentiment:
///     url: "http://localhost:8082/polarity"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServicesConfig {
    /// Deadline for a whole analysis request (humantime, e.g. "60s")
    pub timeout: String,

    /// Deadline for a single HTTP call to any service
    pub http_timeout: String,

    pub embedder: EmbedderConfig,
    pub grammar: GrammarConfig,
    pub sentiment: SentimentConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            timeout: "60s".to_string(),
            http_timeout: "30s".to_string(),
            embedder: EmbedderConfig::default(),
            grammar: GrammarConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

impl ServicesConfig {
    pub fn request_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(self.timeout.trim())
            .with_context(|| format!("invalid services.timeout '{}'", self.timeout))
    }

    pub fn http_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(self.http_timeout.trim())
            .with_context(|| format!("invalid services.http_timeout '{}'", self.http_timeout))
    }
}

/// OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct EmbedderConfig {
    pub url: String,
    pub model: String,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/v1/embeddings".to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
        }
    }
}

/// LanguageTool `/v2/check` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct GrammarConfig {
    pub url: String,
    pub language: String,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8081/v2/check".to_string(),
            language: "en-US".to_string(),
        }
    }
}

/// Sentiment endpoint answering `{"text": ...}` with polarity scores.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SentimentConfig {
    pub url: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8082/polarity".to_string(),
        }
    }
}

/// Validate service settings at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_services(config: &ServicesConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("services.timeout", &config.timeout),
        ("services.http_timeout", &config.http_timeout),
    ] {
        match humantime::parse_duration(value.trim()) {
            Ok(d) if d.is_zero() => errors.push(format!("{}: must be greater than zero", field)),
            Ok(_) => {}
            Err(e) => errors.push(format!("{}: invalid duration '{}' - {}", field, value, e)),
        }
    }

    for (field, url) in [
        ("services.embedder.url", &config.embedder.url),
        ("services.grammar.url", &config.grammar.url),
        ("services.sentiment.url", &config.sentiment.url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("{}: must be an http(s) URL, got '{}'", field, url));
        }
    }

    if config.embedder.model.trim().is_empty() {
        errors.push("services.embedder.model: must not be empty".to_string());
    }
    if config.grammar.language.trim().is_empty() {
        errors.push("services.grammar.language: must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_services_valid() {
        let config = ServicesConfig::default();
        assert!(validate_services(&config).is_ok());
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(60));
        assert_eq!(config.http_timeout().unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_services_parse() {
        let yaml = r#"
timeout: "2m"
grammar:
  url: "http://lt:8010/v2/check"
"#;
        let config: ServicesConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(120));
        assert_eq!(config.grammar.url, "http://lt:8010/v2/check");
        assert_eq!(config.grammar.language, "en-US");
        assert_eq!(config.embedder, EmbedderConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "retries: 3\n";
        assert!(serde_saphyr::from_str::<ServicesConfig>(yaml).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ServicesConfig {
            timeout: "soon".to_string(),
            http_timeout: "0s".to_string(),
            embedder: EmbedderConfig {
                url: "localhost:8080".to_string(),
                model: " ".to_string(),
            },
            ..ServicesConfig::default()
        };
        let errors = validate_services(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("services.timeout"));
        assert!(errors[1].contains("greater than zero"));
        assert!(errors[2].starts_with("services.embedder.url"));
        assert!(errors[3].starts_with("services.embedder.model"));
    }
}
