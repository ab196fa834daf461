use serde::{Deserialize, Serialize};

/// Rubric configuration.
///
/// Defines how a transcript is scored. Every section is optional and falls
/// back to the standard rubric (weights 40/10/20/15/15). Band tables are
/// checked in order and the first matching range wins.
///
/// Example YAML:
/// ```yaml
/// rubric:
///   speech_rate:
///     bands:
///       - { range: "111-140", score: 10 }
///       - { range: "81-160", score: 6 }
///     otherwise: 2
///   clarity:
///     filler_words: ["um", "uh", "like"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RubricConfig {
    pub content: ContentConfig,
    pub speech_rate: SpeechRateConfig,
    pub language: LanguageConfig,
    pub clarity: ClarityConfig,
    pub engagement: EngagementConfig,
}

/// One row of a band table.
/// Range format: "<N", "<=N", ">N", ">=N", "N-M" (inclusive range), "N"
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Band {
    /// Range expression (e.g., "111-140", ">=0.9")
    pub range: String,

    /// Points awarded when the metric falls in the range
    pub score: f64,
}

fn band(range: &str, score: f64) -> Band {
    Band {
        range: range.to_string(),
        score,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Salutation phrases worth a fixed number of points.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SalutationTier {
    pub points: f64,
    pub phrases: Vec<String>,
}

/// Topics probed by semantic similarity, each worth `points_each`, capped at `cap`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TopicSet {
    pub points_each: f64,
    pub cap: f64,
    pub topics: Vec<String>,
}

/// Content & Structure: salutation, topic coverage and flow.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ContentConfig {
    pub weight: f64,

    /// Raw points are capped here before scaling to `weight`
    pub raw_cap: f64,

    /// Number of leading characters searched for a salutation
    pub salutation_window: usize,

    /// Checked first; the weak tier only applies when no strong phrase matches
    pub strong_salutations: SalutationTier,
    pub weak_salutations: SalutationTier,

    /// Awarded whenever any salutation was found
    pub flow_points: f64,

    /// A topic counts as covered when its best sentence similarity exceeds this
    pub topic_threshold: f64,

    pub must_have: TopicSet,
    pub good_to_have: TopicSet,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            weight: 40.0,
            raw_cap: 35.0,
            salutation_window: 50,
            strong_salutations: SalutationTier {
                points: 4.0,
                phrases: strings(&[
                    "good morning",
                    "good afternoon",
                    "good evening",
                    "good day",
                    "hello everyone",
                ]),
            },
            weak_salutations: SalutationTier {
                points: 2.0,
                phrases: strings(&["hi", "hello"]),
            },
            flow_points: 5.0,
            topic_threshold: 0.35,
            must_have: TopicSet {
                points_each: 4.0,
                cap: 20.0,
                topics: strings(&["Name", "Age", "School class", "Family", "Hobbies interest"]),
            },
            good_to_have: TopicSet {
                points_each: 2.0,
                cap: 10.0,
                topics: strings(&[
                    "Family details",
                    "Origin",
                    "Ambition goal",
                    "Unique fact",
                    "Achievements",
                ]),
            },
        }
    }
}

/// Speech Rate: words per minute banded directly into points.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SpeechRateConfig {
    pub weight: f64,
    pub bands: Vec<Band>,
    pub otherwise: f64,
}

impl Default for SpeechRateConfig {
    fn default() -> Self {
        Self {
            weight: 10.0,
            bands: vec![
                band("111-140", 10.0),
                band("141-160", 6.0),
                band("81-110", 6.0),
            ],
            otherwise: 2.0,
        }
    }
}

/// Vocabulary richness bands over the type-token ratio.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct VocabularyConfig {
    pub bands: Vec<Band>,
    pub otherwise: f64,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                band(">=0.9", 10.0),
                band(">=0.7", 8.0),
                band(">=0.5", 6.0),
                band(">=0.3", 4.0),
            ],
            otherwise: 2.0,
        }
    }
}

/// Language: grammar-error density plus vocabulary richness.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct LanguageConfig {
    pub weight: f64,

    /// Points for an error-free transcript; the vocabulary gets `weight - grammar_points`
    pub grammar_points: f64,

    /// Errors per 100 words at which grammar points reach zero
    pub error_ceiling_per_100: f64,

    pub vocabulary: VocabularyConfig,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            weight: 20.0,
            grammar_points: 10.0,
            error_ceiling_per_100: 10.0,
            vocabulary: VocabularyConfig::default(),
        }
    }
}

/// Clarity: filler words per 100 words.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ClarityConfig {
    pub weight: f64,

    /// Compared against lowercased word tokens
    pub filler_words: Vec<String>,

    pub bands: Vec<Band>,
    pub otherwise: f64,
}

impl Default for ClarityConfig {
    fn default() -> Self {
        Self {
            weight: 15.0,
            filler_words: strings(&[
                "um", "uh", "like", "you know", "so", "actually", "basically", "right",
                "i mean", "well", "kinda", "sort of", "okay", "hmm", "ah",
            ]),
            bands: vec![
                band("0-3", 15.0),
                band("4-6", 12.0),
                band("7-9", 9.0),
                band("10-12", 6.0),
            ],
            otherwise: 3.0,
        }
    }
}

/// Engagement: sentiment compound normalized to [0, 1].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct EngagementConfig {
    pub weight: f64,
    pub bands: Vec<Band>,
    pub otherwise: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            weight: 15.0,
            bands: vec![
                band(">=0.9", 15.0),
                band(">=0.7", 12.0),
                band(">=0.5", 9.0),
                band(">=0.3", 6.0),
            ],
            otherwise: 3.0,
        }
    }
}
