use crate::load;
use declscope_core::{ConvertConfig, index_and_convert};
use std::path::Path;
use tracing::info;

/// Convert the document at `input` and serialize the entities as pretty JSON.
pub fn render(input: &Path, config: &ConvertConfig) -> Result<String, Box<dyn std::error::Error>> {
    let mut project = load(input)?;
    let (index, entities) = index_and_convert(&mut project, config)?;
    info!(
        "Converted {} entities from {} indexed nodes",
        entities.len(),
        index.len()
    );
    Ok(serde_json::to_string_pretty(&entities)?)
}

pub fn run(
    input: &Path,
    output: Option<&Path>,
    config: &ConvertConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Converting {}...", input.display());
    let json = render(input, config)?;

    match output {
        Some(output) => {
            std::fs::write(output, json)?;
            info!("Entities written to {}", output.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
