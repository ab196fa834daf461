//! Content & Structure: salutation, semantic topic coverage and flow.

use super::config::{ContentConfig, TopicSet};
use super::result::{Criterion, Evaluation};
use crate::error::RubricError;
use crate::services::Embedder;

/// Breakdown of the content criterion before it becomes an [`Evaluation`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBreakdown {
    pub salutation: f64,
    pub found_must: Vec<String>,
    pub found_good: Vec<String>,
    pub keywords: f64,
    pub flow: f64,
    pub raw: f64,
    pub weighted: f64,
}

/// Points for the opening salutation. Strong phrases are checked first;
/// matching is a plain substring test over the lowercased opening window.
pub fn salutation_score(transcript: &str, rubric: &ContentConfig) -> f64 {
    let opening: String = transcript
        .to_lowercase()
        .chars()
        .take(rubric.salutation_window)
        .collect();

    let contains_any = |phrases: &[String]| phrases.iter().any(|p| opening.contains(p.as_str()));
    if contains_any(&rubric.strong_salutations.phrases) {
        rubric.strong_salutations.points
    } else if contains_any(&rubric.weak_salutations.phrases) {
        rubric.weak_salutations.points
    } else {
        0.0
    }
}

/// Topics whose best similarity against any sentence exceeds `threshold`.
/// `similarities[i]` holds topic `i` against every sentence.
pub fn topics_found(topics: &[String], similarities: &[Vec<f32>], threshold: f64) -> Vec<String> {
    topics
        .iter()
        .zip(similarities)
        .filter(|(_, row)| {
            row.iter()
                .copied()
                .fold(None, |best: Option<f32>, s| Some(best.map_or(s, |b| b.max(s))))
                .is_some_and(|best| f64::from(best) > threshold)
        })
        .map(|(topic, _)| topic.clone())
        .collect()
}

fn topic_points(set: &TopicSet, found: usize) -> f64 {
    (found as f64 * set.points_each).min(set.cap)
}

/// Combine the three content signals into raw and weighted points.
pub fn content_breakdown(
    salutation: f64,
    found_must: Vec<String>,
    found_good: Vec<String>,
    rubric: &ContentConfig,
) -> ContentBreakdown {
    let keywords = topic_points(&rubric.must_have, found_must.len())
        + topic_points(&rubric.good_to_have, found_good.len());
    // Any salutation also earns the flow points
    let flow = if salutation > 0.0 { rubric.flow_points } else { 0.0 };
    let raw = salutation + keywords + flow;
    let weighted = raw.min(rubric.raw_cap) / rubric.raw_cap * rubric.weight;

    ContentBreakdown {
        salutation,
        found_must,
        found_good,
        keywords,
        flow,
        raw,
        weighted,
    }
}

/// Embed sentences and topic labels, then score coverage.
pub async fn evaluate_content(
    transcript: &str,
    sentences: &[String],
    rubric: &ContentConfig,
    embedder: &dyn Embedder,
) -> Result<Evaluation, RubricError> {
    let service = embedder.name();
    let labels: Vec<String> = rubric
        .must_have
        .topics
        .iter()
        .chain(&rubric.good_to_have.topics)
        .cloned()
        .collect();

    let (found_must, found_good) = if sentences.is_empty() || labels.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let (sentence_vectors, label_vectors) =
            tokio::try_join!(embedder.encode(sentences), embedder.encode(&labels))
                .map_err(|e| RubricError::collaborator(service, e))?;
        let similarities = embedder
            .cosine_similarity(&label_vectors, &sentence_vectors)
            .map_err(|e| RubricError::collaborator(service, e))?;

        let (must_rows, good_rows) = similarities.split_at(rubric.must_have.topics.len().min(similarities.len()));
        (
            topics_found(&rubric.must_have.topics, must_rows, rubric.topic_threshold),
            topics_found(&rubric.good_to_have.topics, good_rows, rubric.topic_threshold),
        )
    };

    let breakdown = content_breakdown(salutation_score(transcript, rubric), found_must, found_good, rubric);
    tracing::debug!(
        salutation = breakdown.salutation,
        must = ?breakdown.found_must,
        good = ?breakdown.found_good,
        raw = breakdown.raw,
        "content scored"
    );

    let feedback = format!(
        "Keywords: {} mandatory, {} optional.",
        breakdown.found_must.len(),
        breakdown.found_good.len()
    );
    Ok(Evaluation::new(Criterion::ContentStructure, breakdown.weighted, feedback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{unit, FailingEmbedder, TableEmbedder};

    fn rubric() -> ContentConfig {
        ContentConfig::default()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_salutation_strong() {
        assert_eq!(salutation_score("Good Morning everyone, I am Asha", &rubric()), 4.0);
        assert_eq!(salutation_score("HELLO EVERYONE!", &rubric()), 4.0);
    }

    #[test]
    fn test_salutation_weak() {
        assert_eq!(salutation_score("Hello, my name is Ravi", &rubric()), 2.0);
        assert_eq!(salutation_score("Hi there", &rubric()), 2.0);
    }

    #[test]
    fn test_salutation_strong_wins_over_weak() {
        // "hello everyone" also contains "hello"
        assert_eq!(salutation_score("hello everyone", &rubric()), 4.0);
    }

    #[test]
    fn test_salutation_substring_match() {
        // "hi" inside "this" counts; matching is not word-bounded
        assert_eq!(salutation_score("This is my talk", &rubric()), 2.0);
    }

    #[test]
    fn test_salutation_outside_window() {
        let text = format!("{} good morning", "x".repeat(50));
        assert_eq!(salutation_score(&text, &rubric()), 0.0);
        assert_eq!(salutation_score("My name is Asha", &rubric()), 0.0);
    }

    #[test]
    fn test_topics_found_strictly_above_threshold() {
        let topics = names(&["A", "B", "C"]);
        let sims = vec![vec![0.1, 0.36], vec![0.35, 0.2], vec![]];
        assert_eq!(topics_found(&topics, &sims, 0.35), vec!["A"]);
    }

    #[test]
    fn test_breakdown_example() {
        let b = content_breakdown(
            4.0,
            names(&["Name", "Age", "Family"]),
            names(&["Origin"]),
            &rubric(),
        );
        assert_eq!(b.keywords, 14.0);
        assert_eq!(b.flow, 5.0);
        assert_eq!(b.raw, 23.0);
        assert!((b.weighted - 23.0 / 35.0 * 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_caps() {
        let b = content_breakdown(
            4.0,
            names(&["1", "2", "3", "4", "5", "6"]),
            names(&["1", "2", "3", "4", "5", "6"]),
            &rubric(),
        );
        assert_eq!(b.keywords, 30.0);
        assert_eq!(b.raw, 39.0);
        assert_eq!(b.weighted, 40.0);
    }

    #[test]
    fn test_breakdown_no_salutation_no_flow() {
        let b = content_breakdown(0.0, vec![], vec![], &rubric());
        assert_eq!(b.flow, 0.0);
        assert_eq!(b.weighted, 0.0);
    }

    #[test]
    fn test_weighted_non_decreasing_in_found_counts() {
        let r = rubric();
        let topic = |n: usize| (0..n).map(|i| i.to_string()).collect::<Vec<_>>();
        for salutation in [0.0, 2.0, 4.0] {
            for good in 0..=5 {
                let mut previous = -1.0;
                for must in 0..=5 {
                    let w = content_breakdown(salutation, topic(must), topic(good), &r).weighted;
                    assert!(w >= previous);
                    previous = w;
                }
            }
            for must in 0..=5 {
                let mut previous = -1.0;
                for good in 0..=5 {
                    let w = content_breakdown(salutation, topic(must), topic(good), &r).weighted;
                    assert!(w >= previous);
                    assert!((0.0..=40.0).contains(&w));
                    previous = w;
                }
            }
        }
    }

    #[tokio::test]
    async fn test_evaluate_content_with_embeddings() {
        // sentence 0 matches "Name", sentence 1 matches "Origin"
        let embedder = TableEmbedder::new(4)
            .with_vector("My name is Asha.", unit(4, 0))
            .with_vector("I am from Pune.", unit(4, 1))
            .with_vector("Name", unit(4, 0))
            .with_vector("Origin", unit(4, 1));
        let sentences = names(&["My name is Asha.", "I am from Pune."]);

        let eval = evaluate_content("Hi, my name is Asha.", &sentences, &rubric(), &embedder)
            .await
            .unwrap();

        assert_eq!(eval.criterion, Criterion::ContentStructure);
        assert_eq!(eval.feedback, "Keywords: 1 mandatory, 1 optional.");
        // 2 (weak) + 4 + 2 + 5 (flow) = 13
        assert!((eval.score - 13.0 / 35.0 * 40.0).abs() < 1e-9);
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn test_evaluate_content_no_sentences_skips_embedder() {
        let eval = evaluate_content("Good day", &[], &rubric(), &FailingEmbedder)
            .await
            .unwrap();
        assert_eq!(eval.feedback, "Keywords: 0 mandatory, 0 optional.");
        assert!((eval.score - 9.0 / 35.0 * 40.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_evaluate_content_propagates_embedder_failure() {
        let sentences = names(&["Hello."]);
        let err = evaluate_content("Hello.", &sentences, &rubric(), &FailingEmbedder)
            .await
            .unwrap_err();
        assert!(matches!(err, RubricError::Collaborator { service: "embedder", .. }));
    }
}
