//! Blocking query execution over the async Bolt driver

use crate::config::Neo4jConfig;
use crate::error::{to_execution_error, Neo4jError, Result};
use biograph_domain::{ExecutionError, GraphExecutor, ParamValue, Parameters, Row};
use neo4rs::{query, ConfigBuilder, Database, Graph, Query};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// [`GraphExecutor`] backed by a Neo4j connection pool
///
/// Created inside a tokio runtime; [`GraphExecutor::execute`] then blocks on
/// that runtime. Call `execute` from synchronous code or a
/// `spawn_blocking` task, never directly from an async task.
pub struct Neo4jExecutor {
    graph: Graph,
    handle: Handle,
    timeout: Duration,
    uri: String,
    database: String,
}

impl Neo4jExecutor {
    /// Open a connection pool
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        config.validate()?;

        let graph_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(Database::from(config.database.as_str()))
            .max_connections(config.max_connections)
            .build()?;

        let graph = Graph::connect(graph_config)
            .await
            .map_err(|e| Neo4jError::Connection {
                uri: config.uri.clone(),
                message: e.to_string(),
            })?;

        info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");

        Ok(Self {
            graph,
            handle: Handle::current(),
            timeout: config.query_timeout(),
            uri: config.uri.clone(),
            database: config.database.clone(),
        })
    }

    /// Bolt URI of the server
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Database name
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Check that the server answers `RETURN 1 AS test`
    pub async fn verify_connectivity(&self) -> Result<()> {
        let rows = self.fetch(query("RETURN 1 AS test")).await?;
        match rows.first().and_then(|row| row.get("test")).and_then(Value::as_i64) {
            Some(1) => Ok(()),
            _ => Err(Neo4jError::Connection {
                uri: self.uri.clone(),
                message: "connectivity check returned an unexpected result".to_string(),
            }),
        }
    }

    /// Total number of nodes in the database
    pub async fn node_count(&self) -> Result<i64> {
        let rows = self.fetch(query("MATCH (n) RETURN count(n) AS count")).await?;
        Ok(rows
            .first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .unwrap_or(0))
    }

    async fn fetch(&self, statement: Query) -> std::result::Result<Vec<Row>, ExecutionError> {
        let mut stream = self
            .graph
            .execute(statement)
            .await
            .map_err(|e| to_execution_error(&e))?;

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| to_execution_error(&e))? {
            let value = row
                .to::<Value>()
                .map_err(|e| ExecutionError::runtime(format!("failed to decode row: {}", e)))?;
            rows.push(into_row(value));
        }
        Ok(rows)
    }
}

impl GraphExecutor for Neo4jExecutor {
    fn execute(
        &self,
        query_text: &str,
        parameters: &Parameters,
    ) -> std::result::Result<Vec<Row>, ExecutionError> {
        let statement = build_query(query_text, parameters);
        let started = Instant::now();

        let outcome = self
            .handle
            .block_on(async { tokio::time::timeout(self.timeout, self.fetch(statement)).await });

        match outcome {
            Ok(Ok(rows)) => {
                debug!(
                    rows = rows.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query executed"
                );
                Ok(rows)
            }
            Ok(Err(error)) => {
                warn!(category = %error.category, error = %error.message, "Query failed");
                Err(error)
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Query timed out");
                Err(ExecutionError::timeout(format!(
                    "query exceeded {}s",
                    self.timeout.as_secs()
                )))
            }
        }
    }
}

/// Attach bound parameters to a statement
fn build_query(text: &str, parameters: &Parameters) -> Query {
    let text = text.trim().trim_end_matches(';');
    parameters
        .iter()
        .fold(query(text), |statement, (name, value)| match value {
            ParamValue::Text(s) => statement.param(name, s.clone()),
            ParamValue::Integer(i) => statement.param(name, *i),
            ParamValue::Float(f) => statement.param(name, *f),
            ParamValue::Bool(b) => statement.param(name, *b),
        })
}

/// Rows decode to objects; anything else lands in a single `value` column
fn into_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => {
            let mut row = Row::new();
            row.insert("value".to_string(), other);
            row
        }
    }
}
