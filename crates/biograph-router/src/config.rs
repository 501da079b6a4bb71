//! Pipeline configuration loaded from TOML

use biograph_catalog::MatcherConfig;
use biograph_generator::GeneratorConfig;
use biograph_synthesizer::SynthesizerConfig;
use biograph_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Pipeline configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// An environment variable held an unusable value
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Value found
        value: String,
    },

    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The graph schema could not be loaded
    #[error("Failed to load schema: {0}")]
    Schema(#[from] biograph_domain::SchemaError),
}

/// Settings for the query pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound on attempts per question, the template attempt included
    pub max_iterations: usize,

    /// Classifications below this confidence skip the template matcher
    pub min_intent_confidence: f64,

    /// Suggestions returned by `get_suggestions`
    pub suggestion_limit: usize,

    /// Questions processed concurrently in batch mode
    pub batch_workers: usize,

    /// Validate candidates before execution
    pub enable_validation: bool,

    /// Retry failed attempts with generation; off means one attempt
    pub enable_refinement: bool,

    /// Template scoring weights
    pub matcher: MatcherConfig,

    /// Query generation settings
    pub generator: GeneratorConfig,

    /// Static checks applied to candidates
    pub validator: ValidatorConfig,

    /// Answer rendering limits
    pub synthesizer: SynthesizerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            min_intent_confidence: 0.2,
            suggestion_limit: 5,
            batch_workers: 4,
            enable_validation: true,
            enable_refinement: true,
            matcher: MatcherConfig::default(),
            generator: GeneratorConfig::default(),
            validator: ValidatorConfig::default(),
            synthesizer: SynthesizerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Strict preset: every check, mandatory LIMIT, fewer retries
    pub fn strict() -> Self {
        Self {
            max_iterations: 2,
            min_intent_confidence: 0.4,
            validator: ValidatorConfig::strict(),
            matcher: MatcherConfig {
                min_score: 2.0,
                ..MatcherConfig::default()
            },
            ..Self::default()
        }
    }

    /// Exploratory preset: more repair attempts and lower routing thresholds
    pub fn exploratory() -> Self {
        Self {
            max_iterations: 5,
            min_intent_confidence: 0.1,
            suggestion_limit: 10,
            generator: GeneratorConfig::thorough(),
            matcher: MatcherConfig {
                min_score: 0.5,
                ..MatcherConfig::default()
            },
            ..Self::default()
        }
    }

    /// Attempts a question may consume
    pub fn attempt_budget(&self) -> usize {
        if self.enable_refinement {
            self.max_iterations
        } else {
            1
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_intent_confidence) {
            return Err(ConfigError::Invalid(format!(
                "min_intent_confidence must be between 0.0 and 1.0, got {}",
                self.min_intent_confidence
            )));
        }
        if self.batch_workers == 0 {
            return Err(ConfigError::Invalid(
                "batch_workers must be greater than 0".to_string(),
            ));
        }
        if self.matcher.min_score < 0.0 {
            return Err(ConfigError::Invalid(
                "matcher.min_score must not be negative".to_string(),
            ));
        }
        if self.synthesizer.max_table_rows == 0 {
            return Err(ConfigError::Invalid(
                "synthesizer.max_table_rows must be greater than 0".to_string(),
            ));
        }
        self.generator.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply `BIOGRAPH_MAX_ITERATIONS` from the environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        const MAX_ITERATIONS: &str = "BIOGRAPH_MAX_ITERATIONS";

        if let Some(value) = lookup(MAX_ITERATIONS) {
            self.max_iterations = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidEnv {
                    var: MAX_ITERATIONS.to_string(),
                    value,
                })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
        assert!(PipelineConfig::strict().validate().is_ok());
        assert!(PipelineConfig::exploratory().validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.min_intent_confidence, 0.2);
        assert_eq!(config.batch_workers, 4);
        assert_eq!(config.attempt_budget(), 3);
    }

    #[test]
    fn test_refinement_off_means_one_attempt() {
        let config = PipelineConfig {
            enable_refinement: false,
            ..PipelineConfig::default()
        };
        assert_eq!(config.attempt_budget(), 1);
    }

    #[test]
    fn test_invalid_values() {
        let zero = PipelineConfig {
            max_iterations: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));

        let confidence = PipelineConfig {
            min_intent_confidence: 1.5,
            ..PipelineConfig::default()
        };
        assert!(confidence.validate().is_err());
    }

    #[test]
    fn test_nested_sections_from_toml() {
        let config = PipelineConfig::from_toml(
            r#"
            max_iterations = 4

            [matcher]
            min_score = 2.5

            [generator]
            max_few_shot_examples = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.matcher.min_score, 2.5);
        assert_eq!(config.matcher.tag_weight, 1.5);
        assert_eq!(config.generator.max_few_shot_examples, 2);
        assert!(config.enable_validation);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::exploratory();
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "batch_workers = 2\nenable_refinement = false").unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.batch_workers, 2);
        assert_eq!(config.attempt_budget(), 1);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "batch_workers = 0").unwrap();
        assert!(matches!(
            PipelineConfig::from_file(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_env_override() {
        let config = PipelineConfig::default()
            .with_overrides(|k| (k == "BIOGRAPH_MAX_ITERATIONS").then(|| "5".to_string()))
            .unwrap();
        assert_eq!(config.max_iterations, 5);

        let err = PipelineConfig::default()
            .with_overrides(|_| Some("many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }
}
