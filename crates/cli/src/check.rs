use declscope_core::{DocError, parse_str};
use std::path::Path;
use tracing::{error, info};

/// Parse the document and count its top-level declarations.
pub fn check(text: &str) -> Result<usize, DocError> {
    let project = parse_str(text)?;
    Ok(project.children.len())
}

pub fn run(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| format!("cannot read {}: {e}", input.display()))?;

    match check(&text) {
        Ok(count) => {
            info!("{} is valid ({count} top-level declarations)", input.display());
            Ok(())
        }
        Err(DocError::SchemaMismatch(mismatch)) => {
            for field_error in &mismatch.errors {
                error!("{field_error}");
            }
            Err(format!(
                "{} does not match the TypeDoc schema ({} errors)",
                input.display(),
                mismatch.errors.len()
            )
            .into())
        }
        Err(other) => Err(other.into()),
    }
}
