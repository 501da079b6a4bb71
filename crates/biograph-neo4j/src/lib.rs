//! BioGraph Neo4j Adapter
//!
//! Implements the domain [`GraphExecutor`](biograph_domain::GraphExecutor)
//! over the `neo4rs` Bolt driver. The driver is async; this crate exposes the
//! blocking interface the pipeline expects by running each statement on the
//! runtime the executor was created in, bounded by a per-statement timeout.
//!
//! Driver and server errors are sorted into the domain error categories
//! (syntax, runtime, timeout, unavailable) so the refinement loop can decide
//! whether another attempt is worthwhile.
//!
//! ```no_run
//! use biograph_domain::{GraphExecutor, Parameters};
//! use biograph_neo4j::{Neo4jConfig, Neo4jExecutor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Neo4jConfig::default().with_env_overrides();
//! let executor = Neo4jExecutor::connect(&config).await?;
//! executor.verify_connectivity().await?;
//!
//! let rows = tokio::task::spawn_blocking(move || {
//!     executor.execute("MATCH (d:Drug) RETURN d.name AS name LIMIT 5", &Parameters::new())
//! })
//! .await??;
//! println!("{} rows", rows.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod executor;

pub use config::Neo4jConfig;
pub use error::{categorize, Neo4jError, Result};
pub use executor::Neo4jExecutor;
