use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::RubricError;
use crate::scoring::{RubricResult, RubricScorer};

/// Shortest spoken duration, in seconds, accepted for a transcript.
pub const MIN_DURATION_SECS: f64 = 10.0;

/// Batch manifest.
///
/// Example YAML:
/// ```yaml
/// entries:
///   - transcript: "talks/asha.txt"
///     duration: 52
///     name: "Asha"
///   - transcript: "/abs/path/ravi.txt"
///     duration: 61.5
/// ```
/// Relative transcript paths are resolved against the manifest's directory.
/// Every duration must be at least [`MIN_DURATION_SECS`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BatchManifest {
    pub entries: Vec<BatchEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BatchEntry {
    pub transcript: PathBuf,
    /// Spoken duration in seconds
    pub duration: f64,
    pub name: Option<String>,
}

impl BatchEntry {
    /// Display name: explicit name, else the transcript file name.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.transcript
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.transcript.display().to_string())
        })
    }
}

/// Why one entry produced no result.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scoring(#[from] RubricError),
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub entry: BatchEntry,
    pub result: Result<RubricResult, EntryError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn parse_manifest(content: &str, base_dir: &Path) -> Result<BatchManifest> {
    let mut manifest: BatchManifest = serde_saphyr::from_str(content).context("invalid manifest YAML")?;
    for (i, entry) in manifest.entries.iter_mut().enumerate() {
        if !entry.duration.is_finite() || entry.duration < MIN_DURATION_SECS {
            anyhow::bail!(
                "entries[{}].duration: {} is below the minimum of {} seconds",
                i,
                entry.duration,
                MIN_DURATION_SECS
            );
        }
        if entry.transcript.is_relative() {
            entry.transcript = base_dir.join(&entry.transcript);
        }
    }
    Ok(manifest)
}

pub fn load_manifest(path: &Path) -> Result<BatchManifest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest at {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_manifest(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))
}

async fn score_entry(scorer: &RubricScorer, entry: &BatchEntry) -> Result<RubricResult, EntryError> {
    let transcript = tokio::fs::read_to_string(&entry.transcript)
        .await
        .map_err(|source| EntryError::Read {
            path: entry.transcript.clone(),
            source,
        })?;
    Ok(scorer.analyze(&transcript, entry.duration).await?)
}

/// Score every entry with at most `jobs` in flight.
///
/// Outcomes come back in manifest order. A failing entry does not stop the
/// others.
pub async fn score_batch(scorer: &RubricScorer, manifest: BatchManifest, jobs: usize) -> Vec<BatchOutcome> {
    let mut outcomes: Vec<(usize, BatchOutcome)> = stream::iter(manifest.entries.into_iter().enumerate())
        .map(|(index, entry)| async move {
            let result = score_entry(scorer, &entry).await;
            match &result {
                Ok(r) => tracing::info!(entry = %entry.label(), overall = r.overall_score, "entry scored"),
                Err(e) => tracing::warn!(entry = %entry.label(), error = %e, "entry failed"),
            }
            (index, BatchOutcome { entry, result })
        })
        .buffer_unordered(jobs.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
