use crate::load;
use declscope_api::Entity;
use declscope_core::{Analyzer, ConvertConfig};
use std::path::Path;
use tracing::info;

/// Resolve `path` against the converted document.
pub fn find(
    input: &Path,
    path: &str,
    config: &ConvertConfig,
) -> Result<Entity, Box<dyn std::error::Error>> {
    let analyzer = Analyzer::new(load(input)?, config)?;
    Ok(analyzer.resolve(path)?.clone())
}

pub fn run(input: &Path, path: &str, config: &ConvertConfig) -> Result<(), Box<dyn std::error::Error>> {
    let entity = find(input, path, config)?;
    info!("{path} resolved to {} {}", entity.kind(), entity.path());
    println!("{}", serde_json::to_string_pretty(&entity)?);
    Ok(())
}
