use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::batch::BatchOutcome;
use crate::scoring::{Criterion, Rubric, RubricResult};

/// Criterion scores below this are highlighted as weak
const LOW_SCORE: f64 = 5.0;

/// Widest criterion label ("Content & Structure")
const LABEL_WIDTH: usize = 19;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
pub fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a score against its maximum: "26.3 / 40"
pub fn format_score(score: f64, max: f64) -> String {
    format!("{:.1} / {}", score, max)
}

/// Human-readable report for one result.
///
/// `width` caps each line; feedback is truncated to fit. `None` means no limit.
pub fn format_report(result: &RubricResult, rubric: &Rubric, use_colors: bool, width: Option<usize>) -> String {
    let mut lines = Vec::with_capacity(Criterion::ALL.len() + 2);

    let overall = format!("Overall Score: {}", format_score(result.overall_score, 100.0));
    lines.push(if use_colors {
        overall.bold().to_string()
    } else {
        overall
    });
    lines.push(String::new());

    for (criterion, detail) in &result.details {
        let label = format!("{:<width$}", criterion.label(), width = LABEL_WIDTH);
        let score = format!("{:>11}", format_score(detail.score, rubric.weight(*criterion)));
        // label + 2 + score + 2
        let fixed_width = LABEL_WIDTH + 2 + score.len() + 2;
        let feedback = match width {
            Some(w) if w > fixed_width + 10 => truncate(&detail.feedback, w - fixed_width),
            Some(_) => truncate(&detail.feedback, 20),
            None => detail.feedback.clone(),
        };

        let line = if use_colors {
            let score = if detail.score < LOW_SCORE {
                score.red().to_string()
            } else {
                score.green().to_string()
            };
            format!("{}  {}  {}", label.cyan(), score, feedback.dimmed())
        } else {
            format!("{}  {}  {}", label, score, feedback)
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Pretty JSON for one result.
pub fn format_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `{"error": "..."}`
pub fn format_error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[derive(Serialize)]
struct BatchRow<'a> {
    name: String,
    transcript: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a RubricResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Batch outcomes as a JSON array, one object per manifest entry.
pub fn format_batch_json(outcomes: &[BatchOutcome]) -> anyhow::Result<String> {
    let rows: Vec<BatchRow> = outcomes
        .iter()
        .map(|o| BatchRow {
            name: o.entry.label(),
            transcript: o.entry.transcript.display().to_string(),
            result: o.result.as_ref().ok(),
            error: o.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();
    format_json(&rows)
}

/// Batch outcomes as a table: index, overall score, name, then the five
/// criterion scores or the error.
pub fn format_batch_table(outcomes: &[BatchOutcome], use_colors: bool, width: Option<usize>) -> String {
    if outcomes.is_empty() {
        return "No entries in manifest.".to_string();
    }

    let name_width = outcomes
        .iter()
        .map(|o| o.entry.label().chars().count())
        .max()
        .unwrap_or(0)
        .min(30);

    outcomes
        .iter()
        .enumerate()
        .map(|(idx, outcome)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = format!("{:<width$}", truncate(&outcome.entry.label(), name_width), width = name_width);
            let (score, rest) = match &outcome.result {
                Ok(r) => (
                    format!("{:>5.1}", r.overall_score),
                    r.details
                        .values()
                        .map(|d| format!("{:>4.1}", d.score))
                        .collect::<Vec<_>>()
                        .join(" "),
                ),
                Err(e) => ("    -".to_string(), format!("error: {}", e)),
            };
            // index + space + score + 2 + name + 2
            let fixed_width = index_str.len() + 1 + score.len() + 2 + name_width + 2;
            let rest = match width {
                Some(w) if w > fixed_width + 10 => truncate(&rest, w - fixed_width),
                _ => rest,
            };

            if use_colors {
                let rest = if outcome.is_ok() {
                    rest
                } else {
                    rest.red().to_string()
                };
                format!("{} {}  {}  {}", index_str.dimmed(), score.bold(), name, rest)
            } else {
                format!("{} {}  {}  {}", index_str, score, name, rest)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchEntry, EntryError};
    use crate::error::RubricError;
    use crate::scoring::{aggregate, Evaluation, RubricConfig};
    use std::path::PathBuf;

    fn sample_result() -> RubricResult {
        aggregate([
            Evaluation::new(Criterion::ContentStructure, 26.2857, "Keywords: 3 mandatory, 1 optional.".into()),
            Evaluation::new(Criterion::SpeechRate, 10.0, "115 WPM".into()),
            Evaluation::new(Criterion::Language, 11.0, "TTR: 0.6, Grammar Errors: 5".into()),
            Evaluation::new(Criterion::Clarity, 3.0, "Filler Rate: 14.2%".into()),
            Evaluation::new(Criterion::Engagement, 15.0, "Positivity: 0.9".into()),
        ])
    }

    fn rubric() -> Rubric {
        Rubric::compile(&RubricConfig::default()).unwrap()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer piece of feedback", 10), "a longe...");
        assert_eq!(truncate("abcdef", 2), "ab");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(26.3, 40.0), "26.3 / 40");
        assert_eq!(format_score(77.3, 100.0), "77.3 / 100");
        assert_eq!(format_score(10.0, 10.0), "10.0 / 10");
    }

    #[test]
    fn test_report_plain() {
        let report = format_report(&sample_result(), &rubric(), false, None);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Overall Score: 65.3 / 100");
        assert_eq!(lines.len(), 7);
        assert!(lines[2].starts_with("Content & Structure"));
        assert!(lines[2].contains("26.3 / 40"));
        assert!(lines[2].ends_with("Keywords: 3 mandatory, 1 optional."));
        assert!(lines[6].starts_with("Engagement"));
    }

    #[test]
    fn test_report_truncates_to_width() {
        let report = format_report(&sample_result(), &rubric(), false, Some(50));
        for line in report.lines() {
            assert!(line.chars().count() <= 50, "too wide: {}", line);
        }
        assert!(report.contains("..."));
    }

    #[test]
    fn test_report_colors_low_scores() {
        let colored = format_report(&sample_result(), &rubric(), true, None);
        assert!(colored.contains('\u{1b}'));
        assert!(!format_report(&sample_result(), &rubric(), false, None).contains('\u{1b}'));
    }

    #[test]
    fn test_error_json() {
        assert_eq!(format_error_json("Empty transcript"), r#"{"error":"Empty transcript"}"#);
    }

    fn outcomes() -> Vec<BatchOutcome> {
        vec![
            BatchOutcome {
                entry: BatchEntry {
                    transcript: PathBuf::from("/t/asha.txt"),
                    duration: 52.0,
                    name: Some("Asha".to_string()),
                },
                result: Ok(sample_result()),
            },
            BatchOutcome {
                entry: BatchEntry {
                    transcript: PathBuf::from("/t/blank.txt"),
                    duration: 30.0,
                    name: None,
                },
                result: Err(EntryError::Scoring(RubricError::EmptyTranscript)),
            },
        ]
    }

    #[test]
    fn test_batch_table() {
        let table = format_batch_table(&outcomes(), false, None);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1.  65.3  Asha"));
        assert!(lines[0].ends_with("26.3 10.0 11.0  3.0 15.0"));
        assert!(lines[1].contains("blank.txt"));
        assert!(lines[1].ends_with("error: Empty transcript"));
        assert_eq!(format_batch_table(&[], false, None), "No entries in manifest.");
    }

    #[test]
    fn test_batch_json() {
        let json = format_batch_json(&outcomes()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["name"], "Asha");
        assert_eq!(parsed[0]["result"]["overall_score"], 65.3);
        assert!(parsed[0].get("error").is_none());
        assert_eq!(parsed[1]["error"], "Empty transcript");
        assert!(parsed[1].get("result").is_none());
    }
}
