use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum DescriptionItem {
    Text(String),
    Code(String),
}

/// Prose attached to an entity, in authored order.
pub type Description = Vec<DescriptionItem>;

/// Deprecation marker: either a plain flag or the reason the author gave.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum Deprecation {
    Flag(bool),
    Reason(Description),
}

impl Deprecation {
    pub fn is_deprecated(&self) -> bool {
        match self {
            Deprecation::Flag(flag) => *flag,
            Deprecation::Reason(_) => true,
        }
    }
}

impl Default for Deprecation {
    fn default() -> Self {
        Deprecation::Flag(false)
    }
}
