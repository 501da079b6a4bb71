//! Connected application state shared by the query-running commands.

use crate::config::Config;
use crate::error::Result;
use biograph_domain::{GraphExecutor, GraphSchema};
use biograph_neo4j::Neo4jExecutor;
use biograph_router::{BatchRunner, QueryPipeline};
use std::sync::Arc;
use tracing::info;

/// A pipeline wired to Neo4j and the configured language model.
pub struct App {
    pipeline: Arc<QueryPipeline>,
    executor: Arc<Neo4jExecutor>,
}

impl App {
    /// Connect to the database, build the model client and assemble the pipeline.
    pub async fn connect(config: &Config) -> Result<Self> {
        let executor = Arc::new(Neo4jExecutor::connect(&config.neo4j).await?);
        executor.verify_connectivity().await?;

        let model = config.llm.build()?;
        let graph: Arc<dyn GraphExecutor> = executor.clone();
        let mut pipeline = QueryPipeline::new(config.pipeline.clone(), model, graph)?;

        if let Some(path) = &config.settings.schema_path {
            let schema = GraphSchema::from_file(path)?;
            info!(path = %path.display(), "Loaded custom schema");
            pipeline = pipeline.with_schema(schema);
        }

        Ok(Self {
            pipeline: Arc::new(pipeline),
            executor,
        })
    }

    /// The query pipeline.
    pub fn pipeline(&self) -> &Arc<QueryPipeline> {
        &self.pipeline
    }

    /// The database connection.
    pub fn executor(&self) -> &Neo4jExecutor {
        &self.executor
    }

    /// Runner for answering questions off the async runtime.
    ///
    /// The Neo4j executor blocks on the runtime, so every question goes
    /// through the blocking pool, even a single one.
    pub fn runner(&self) -> BatchRunner {
        BatchRunner::new(Arc::clone(&self.pipeline))
    }
}
