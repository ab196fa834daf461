use anyhow::{bail, Result};
use std::collections::HashSet;

use super::bands::ScoreBands;
use super::config::{ContentConfig, RubricConfig, SalutationTier};
use super::result::Criterion;
use super::validation::validate_rubric;

/// A criterion scored purely by a band table.
#[derive(Debug, Clone)]
pub struct BandedCriterion {
    pub weight: f64,
    pub bands: ScoreBands,
}

#[derive(Debug, Clone)]
pub struct LanguageRubric {
    pub weight: f64,
    pub grammar_points: f64,
    pub error_ceiling_per_100: f64,
    pub vocabulary: ScoreBands,
}

impl LanguageRubric {
    /// Points available to the vocabulary sub-score.
    pub fn vocabulary_points(&self) -> f64 {
        self.weight - self.grammar_points
    }
}

#[derive(Debug, Clone)]
pub struct ClarityRubric {
    pub weight: f64,
    pub filler_words: HashSet<String>,
    pub bands: ScoreBands,
}

/// Validated, ready-to-evaluate rubric. Built once at startup.
#[derive(Debug, Clone)]
pub struct Rubric {
    /// Salutation phrases are stored lowercased
    pub content: ContentConfig,
    pub speech_rate: BandedCriterion,
    pub language: LanguageRubric,
    pub clarity: ClarityRubric,
    pub engagement: BandedCriterion,
}

fn lowercase_tier(tier: &SalutationTier) -> SalutationTier {
    SalutationTier {
        points: tier.points,
        phrases: tier.phrases.iter().map(|p| p.to_lowercase()).collect(),
    }
}

impl Rubric {
    pub fn compile(config: &RubricConfig) -> Result<Self> {
        if let Err(errors) = validate_rubric(config) {
            bail!("invalid rubric configuration:\n  - {}", errors.join("\n  - "));
        }

        let mut content = config.content.clone();
        content.strong_salutations = lowercase_tier(&config.content.strong_salutations);
        content.weak_salutations = lowercase_tier(&config.content.weak_salutations);

        Ok(Self {
            content,
            speech_rate: BandedCriterion {
                weight: config.speech_rate.weight,
                bands: ScoreBands::compile(&config.speech_rate.bands, config.speech_rate.otherwise)?,
            },
            language: LanguageRubric {
                weight: config.language.weight,
                grammar_points: config.language.grammar_points,
                error_ceiling_per_100: config.language.error_ceiling_per_100,
                vocabulary: ScoreBands::compile(
                    &config.language.vocabulary.bands,
                    config.language.vocabulary.otherwise,
                )?,
            },
            clarity: ClarityRubric {
                weight: config.clarity.weight,
                filler_words: config
                    .clarity
                    .filler_words
                    .iter()
                    .map(|w| w.to_lowercase())
                    .collect(),
                bands: ScoreBands::compile(&config.clarity.bands, config.clarity.otherwise)?,
            },
            engagement: BandedCriterion {
                weight: config.engagement.weight,
                bands: ScoreBands::compile(&config.engagement.bands, config.engagement.otherwise)?,
            },
        })
    }

    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::ContentStructure => self.content.weight,
            Criterion::SpeechRate => self.speech_rate.weight,
            Criterion::Language => self.language.weight,
            Criterion::Clarity => self.clarity.weight,
            Criterion::Engagement => self.engagement.weight,
        }
    }
}
