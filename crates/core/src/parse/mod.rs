mod narrow;

pub use narrow::{Discriminated, FieldError, Location, SchemaMismatch, Segment, Variant, narrow};

use crate::error::Result;
use crate::model::Project;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Deserializer over a document that grows the stack as nesting deepens.
pub(crate) fn stacked(document: &Value) -> serde_stacker::Deserializer<&Value> {
    serde_stacker::Deserializer::new(document)
}

/// Deserialize an analysis-tool document.
///
/// On failure the single error serde reports is narrowed down to the
/// smallest subtrees that do not match their discriminated variant.
pub fn parse(document: &Value) -> std::result::Result<Project, SchemaMismatch> {
    Project::deserialize(stacked(document)).map_err(|bulk| {
        debug!(error = %bulk, "document rejected; narrowing");
        SchemaMismatch {
            errors: narrow(document, &bulk),
        }
    })
}

/// Read JSON text, without serde_json's nesting limit, then [`parse`] it.
pub fn parse_str(text: &str) -> Result<Project> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let document = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    let parsed = parse(&document);
    dismantle(document);
    Ok(parsed?)
}

/// Drop a value without recursing once per nesting level.
fn dismantle(document: Value) {
    let mut pending = vec![document];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(object) => pending.extend(object.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}
