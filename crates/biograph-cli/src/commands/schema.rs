//! Schema command implementation. Runs offline.

use crate::config::Config;
use crate::error::Result;
use biograph_domain::GraphSchema;

/// Execute the schema command.
pub fn execute_schema(config: &Config) -> Result<()> {
    let schema = load_schema(config)?;
    println!("{}", schema.summary());
    Ok(())
}

/// The configured schema file, or the built-in BKB schema.
pub fn load_schema(config: &Config) -> Result<GraphSchema> {
    let schema = match &config.settings.schema_path {
        Some(path) => GraphSchema::from_file(path)?,
        None => GraphSchema::builtin()?,
    };
    Ok(schema)
}
