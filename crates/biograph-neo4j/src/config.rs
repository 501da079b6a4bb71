//! Connection settings for Neo4j

use crate::error::{Neo4jError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Connection settings for the knowledge-graph database
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// Bolt URI (e.g. `bolt://localhost:7687`, `neo4j+s://xxxx.databases.neo4j.io`)
    pub uri: String,

    /// User name
    pub user: String,

    /// Password
    pub password: String,

    /// Database name
    pub database: String,

    /// Per-statement deadline in seconds
    pub query_timeout_secs: u64,

    /// Connection pool size
    pub max_connections: usize,
}

impl Neo4jConfig {
    /// Per-statement deadline as a Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Apply `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and `NEO4J_DATABASE`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 4] = [
            ("NEO4J_URI", &mut self.uri),
            ("NEO4J_USER", &mut self.user),
            ("NEO4J_PASSWORD", &mut self.password),
            ("NEO4J_DATABASE", &mut self.database),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        const SCHEMES: &[&str] = &["bolt://", "bolt+s://", "bolt+ssc://", "neo4j://", "neo4j+s://", "neo4j+ssc://"];

        if !SCHEMES.iter().any(|s| self.uri.starts_with(s)) {
            return Err(Neo4jError::Config(format!(
                "uri must start with one of {}, got '{}'",
                SCHEMES.join(", "),
                self.uri
            )));
        }
        if self.user.is_empty() {
            return Err(Neo4jError::Config("user must not be empty".to_string()));
        }
        if self.database.is_empty() {
            return Err(Neo4jError::Config("database must not be empty".to_string()));
        }
        if self.query_timeout_secs == 0 {
            return Err(Neo4jError::Config(
                "query_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(Neo4jError::Config(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            query_timeout_secs: 30,
            max_connections: 8,
        }
    }
}

impl fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = Neo4jConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.query_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_settings() {
        let bad_uri = Neo4jConfig {
            uri: "http://localhost:7474".into(),
            ..Neo4jConfig::default()
        };
        assert!(matches!(bad_uri.validate(), Err(Neo4jError::Config(_))));

        let no_timeout = Neo4jConfig {
            query_timeout_secs: 0,
            ..Neo4jConfig::default()
        };
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn test_overrides_replace_only_present_values() {
        let vars: HashMap<&str, &str> = [
            ("NEO4J_URI", "neo4j+s://abc.databases.neo4j.io"),
            ("NEO4J_PASSWORD", "secret"),
            ("NEO4J_DATABASE", ""),
        ]
        .into_iter()
        .collect();

        let config = Neo4jConfig::default().with_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.uri, "neo4j+s://abc.databases.neo4j.io");
        assert_eq!(config.password, "secret");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.database, "neo4j");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = Neo4jConfig {
            password: "hunter2".into(),
            ..Neo4jConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_partial_toml() {
        let config: Neo4jConfig = toml::from_str("uri = \"bolt://db:7687\"").unwrap();
        assert_eq!(config.uri, "bolt://db:7687");
        assert_eq!(config.max_connections, 8);
    }
}
