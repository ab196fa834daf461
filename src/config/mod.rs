mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::Config;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scoring::validate_rubric;
use crate::services::validate_services;

/// Get the config directory path (~/.config/speech-rubric/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("speech-rubric"))
}

/// Get the default config file path (~/.config/speech-rubric/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Parse a YAML config document.
pub fn parse_config(content: &str) -> Result<Config> {
    // An empty document means "all defaults"
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_saphyr::from_str(content).context("invalid YAML")
}

/// Load configuration from a YAML file
///
/// * `path` - Explicit path to the config file. It must exist.
///
/// With no explicit path the default location is used, and a missing file
/// there yields the built-in defaults.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&content)
        .with_context(|| format!("Failed to parse config in {}", config_path.display()))
}

/// Validate every section, collecting all errors.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if let Err(e) = validate_services(&config.services) {
        errors.extend(e);
    }
    if let Err(e) = validate_rubric(&config.rubric) {
        errors.extend(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Write the config as YAML, atomically. Creates parent directories.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(load_config(Some(path)).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let yaml = r#"
services:
  timeout: "10s"
  grammar:
    language: "en-GB"
rubric:
  speech_rate:
    otherwise: 0
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.services.timeout, "10s");
        assert_eq!(config.services.grammar.language, "en-GB");
        assert_eq!(config.services.grammar.url, "http://localhost:8081/v2/check");
        assert_eq!(config.rubric.speech_rate.otherwise, 0.0);
        assert_eq!(config.rubric.speech_rate.weight, 10.0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_config("servces:\n  timeout: \"1s\"\n").is_err());
    }

    #[test]
    fn test_validate_collects_both_sections() {
        let mut config = Config::default();
        config.services.timeout = "soon".to_string();
        config.rubric.clarity.weight = 20.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("services.timeout")));
        assert!(errors.iter().any(|e| e.starts_with("rubric.")));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.services.embedder.model = "bge-small-en".to_string();
        config.rubric.content.topic_threshold = 0.4;

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(Some(path)).unwrap(), config);
    }
}
