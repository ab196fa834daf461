use serde::{Deserialize, Serialize};

use crate::scoring::RubricConfig;
use crate::services::ServicesConfig;

/// Top-level config file. Both sections are optional; missing ones take
/// their built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub services: ServicesConfig,
    pub rubric: RubricConfig,
}
