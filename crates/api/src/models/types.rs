use super::pathname::Pathname;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A cross reference from a rendered type to a named declaration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeXRef {
    /// Points at an entity inside the analyzed tree.
    Internal { name: String, path: Pathname },
    /// Points at a declaration shipped by another package.
    External {
        name: String,
        package: String,
        source_file_name: String,
        qualified_name: String,
    },
}

impl TypeXRef {
    pub fn name(&self) -> &str {
        match self {
            TypeXRef::Internal { name, .. } | TypeXRef::External { name, .. } => name,
        }
    }
}

/// One renderable unit of a type expression.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum TypeToken {
    Text(String),
    XRef(TypeXRef),
}

impl TypeToken {
    pub fn text(s: impl Into<String>) -> Self {
        TypeToken::Text(s.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeToken::Text(s) => s,
            TypeToken::XRef(xref) => xref.name(),
        }
    }
}

/// A rendered type: text fragments interleaved with cross references, so a
/// renderer can hyperlink the referenced spans.
pub type TypeExpression = Vec<TypeToken>;

/// Flatten a rendered type to the text a reader would see.
pub fn plain_text(tokens: &[TypeToken]) -> String {
    tokens.iter().map(TypeToken::as_str).collect()
}
