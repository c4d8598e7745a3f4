//! Engine configuration
//!
//! Resolved from built-in defaults, then an optional TOML file, then environment
//! variables. Later sources win.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TutorError;
use crate::history::DEFAULT_HISTORY_WINDOW;
use crate::types::LearningStyle;

pub const ENV_DEFAULT_LANGUAGE: &str = "TUTOR_DEFAULT_LANGUAGE";
pub const ENV_DEFAULT_LEARNING_STYLE: &str = "TUTOR_DEFAULT_LEARNING_STYLE";
pub const ENV_HISTORY_WINDOW: &str = "TUTOR_HISTORY_WINDOW";
pub const ENV_RNG_SEED: &str = "TUTOR_RNG_SEED";
pub const ENV_LOG_LEVEL: &str = "RUST_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Language assigned to new profiles and used for text analysis
    pub default_language: String,
    /// Learning style assigned to new profiles
    pub default_learning_style: LearningStyle,
    /// Sessions kept per player for learning insights
    pub history_window: usize,
    /// Seed for learning-style detection; clock-seeded when absent
    pub rng_seed: Option<u64>,
    /// tracing filter directive used by the binary
    pub log_level: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            default_language: "es".to_string(),
            default_learning_style: LearningStyle::Visual,
            history_window: DEFAULT_HISTORY_WINDOW,
            rng_seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl TutorConfig {
    /// Defaults, overlaid with the TOML file (if any) and then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, TutorError> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, TutorError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TutorError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML; missing keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, TutorError> {
        toml::from_str(raw).map_err(|e| TutorError::Config(format!("invalid TOML: {e}")))
    }

    /// Overlay values from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), TutorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(language) = lookup(ENV_DEFAULT_LANGUAGE) {
            self.default_language = language;
        }
        if let Some(style) = lookup(ENV_DEFAULT_LEARNING_STYLE) {
            self.default_learning_style = LearningStyle::from(style.as_str());
        }
        if let Some(window) = lookup(ENV_HISTORY_WINDOW) {
            self.history_window = parse_env(ENV_HISTORY_WINDOW, &window)?;
        }
        if let Some(seed) = lookup(ENV_RNG_SEED) {
            self.rng_seed = Some(parse_env(ENV_RNG_SEED, &seed)?);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), TutorError> {
        if self.history_window == 0 {
            return Err(TutorError::Config(
                "history_window must be at least 1".to_string(),
            ));
        }
        if self.default_language.trim().is_empty() {
            return Err(TutorError::Config(
                "default_language must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, TutorError> {
    value
        .trim()
        .parse()
        .map_err(|_| TutorError::Config(format!("{key}: cannot parse '{value}'")))
}
