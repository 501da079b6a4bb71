//! Status command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use biograph_neo4j::Neo4jExecutor;

/// Execute the status command.
pub async fn execute_status(config: &Config, formatter: &Formatter) -> Result<()> {
    let executor = Neo4jExecutor::connect(&config.neo4j).await?;
    executor.verify_connectivity().await?;
    println!(
        "{}",
        formatter.success(&format!(
            "Connected to {} (database: {})",
            executor.uri(),
            executor.database()
        ))
    );

    let nodes = executor.node_count().await?;
    println!("{}", formatter.info(&format!("Nodes: {}", nodes)));
    println!(
        "{}",
        formatter.info(&format!(
            "Language model: {:?} ({})",
            config.llm.provider, config.llm.model
        ))
    );
    println!(
        "{}",
        formatter.info(&format!(
            "Attempt budget: {}",
            config.pipeline.attempt_budget()
        ))
    );
    Ok(())
}
