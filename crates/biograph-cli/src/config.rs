//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use biograph_domain::OutputFormat;
use biograph_llm::LlmConfig;
use biograph_neo4j::Neo4jConfig;
use biograph_router::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Every section is optional in the file; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database connection
    #[serde(default)]
    pub neo4j: Neo4jConfig,

    /// Language model provider
    #[serde(default)]
    pub llm: LlmConfig,

    /// Routing, validation and refinement
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default answer format
    #[serde(default)]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Log filter used when neither `--verbose` nor `RUST_LOG` is given
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Schema file replacing the built-in BKB schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<PathBuf>,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(biograph_dir()?.join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `~/.biograph/config.toml` is
    /// read when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Recognized: `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`,
    /// `NEO4J_DATABASE`, `OPENAI_MODEL`, `BIOGRAPH_MAX_ITERATIONS` and
    /// `BIOGRAPH_LOG_LEVEL`. `OPENAI_API_KEY` is read when the provider is built.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.neo4j = self.neo4j.with_overrides(&lookup);
        self.pipeline = self.pipeline.with_overrides(&lookup)?;

        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.is_empty()) {
            self.llm.model = model;
        }
        if let Some(level) = lookup("BIOGRAPH_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.settings.log_level = level;
        }
        Ok(self)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.neo4j.validate()?;
        self.pipeline.validate()?;
        if self.llm.timeout_secs == 0 {
            return Err(CliError::Config("llm.timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Natural,
            history_size: default_history_size(),
            log_level: default_log_level(),
            schema_path: None,
        }
    }
}

/// `~/.biograph`, home of the config file and REPL history.
pub fn biograph_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".biograph"))
}

fn default_true() -> bool {
    true
}

fn default_history_size() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Natural);
        assert_eq!(config.settings.log_level, "info");
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.pipeline.max_iterations, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.neo4j.database = "bkb".into();
        config.pipeline.max_iterations = 5;
        config.settings.format = OutputFormat::Table;
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[neo4j]\nuri = \"neo4j://graph:7687\"\n\n[settings]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.neo4j.uri, "neo4j://graph:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("NEO4J_URI", "bolt://db:7687"),
            ("NEO4J_PASSWORD", "secret"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("BIOGRAPH_MAX_ITERATIONS", "4"),
            ("BIOGRAPH_LOG_LEVEL", "debug"),
        ]);
        let config = Config::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.neo4j.uri, "bolt://db:7687");
        assert_eq!(config.neo4j.password, "secret");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.pipeline.max_iterations, 4);
        assert_eq!(config.settings.log_level, "debug");
    }

    #[test]
    fn test_invalid_env_override() {
        let result = Config::default().with_overrides(|key| {
            (key == "BIOGRAPH_MAX_ITERATIONS").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(CliError::Pipeline(_))));
    }
}
