//! Pinpointing why a document failed to parse.
//!
//! A failure deep inside a discriminated union surfaces from serde as one
//! error about the outermost object. Narrowing re-validates every
//! discriminated subtree on its own and keeps only the deepest failures.

use super::stacked;
use crate::model::{NODE_KINDS, Node, Param, Project, Signature, TYPE_KINDS, TypeExpr, TypeParameter};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Where in the document a value sits, e.g. `children[0].type`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location(pub Vec<Segment>);

impl Location {
    fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    fn is_strict_prefix_of(&self, other: &Location) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// The shape a discriminator value selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Node,
    Signature,
    Parameter,
    TypeParameter,
    Project,
    Type,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Node => "declaration",
            Variant::Signature => "signature",
            Variant::Parameter => "parameter",
            Variant::TypeParameter => "type parameter",
            Variant::Project => "project",
            Variant::Type => "type expression",
        }
    }

    fn for_kind_string(value: &str) -> Option<Self> {
        match value {
            "Constructor signature" | "Call signature" | "Get signature" | "Set signature"
            | "Index signature" => Some(Variant::Signature),
            "Parameter" => Some(Variant::Parameter),
            "Type parameter" => Some(Variant::TypeParameter),
            "Project" => Some(Variant::Project),
            other if NODE_KINDS.contains(&other) => Some(Variant::Node),
            _ => None,
        }
    }

    fn for_type(value: &str) -> Option<Self> {
        TYPE_KINDS.contains(&value).then_some(Variant::Type)
    }

    fn validate(self, value: &Value) -> Result<(), serde_json::Error> {
        let value = stacked(value);
        match self {
            Variant::Node => Node::deserialize(value).map(drop),
            Variant::Signature => Signature::deserialize(value).map(drop),
            Variant::Parameter => Param::deserialize(value).map(drop),
            Variant::TypeParameter => TypeParameter::deserialize(value).map(drop),
            Variant::Project => Project::deserialize(value).map(drop),
            Variant::Type => TypeExpr::deserialize(value).map(drop),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The discriminator found at a failing location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminated {
    pub field: &'static str,
    pub value: String,
    /// `None` when no variant answers to the value
    pub variant: Option<Variant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub location: Location,
    pub discriminator: Option<Discriminated>,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}", self.location)?;
        if let Some(d) = &self.discriminator {
            write!(f, " ({} = {:?}", d.field, d.value)?;
            if let Some(variant) = d.variant {
                write!(f, ", expected a {variant}")?;
            }
            f.write_str(")")?;
        }
        write!(f, ": {}", self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("document does not match the expected schema:{}", render_errors(.errors))]
pub struct SchemaMismatch {
    pub errors: Vec<FieldError>,
}

fn render_errors(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("\n  {e}")).collect()
}

const DISCRIMINATORS: [&str; 2] = ["kindString", "type"];

fn discriminator(object: &serde_json::Map<String, Value>) -> Option<Discriminated> {
    DISCRIMINATORS.iter().find_map(|&field| {
        let value = object.get(field)?.as_str()?;
        let variant = match field {
            "kindString" => Variant::for_kind_string(value),
            _ => Variant::for_type(value),
        };
        Some(Discriminated {
            field,
            value: value.to_string(),
            variant,
        })
    })
}

/// Relocate a bulk parse failure to the smallest failing subtrees.
pub fn narrow(document: &Value, bulk: &serde_json::Error) -> Vec<FieldError> {
    let mut failures: Vec<FieldError> = Vec::new();
    let mut stack = vec![(document, Location::default())];

    while let Some((value, location)) = stack.pop() {
        match value {
            Value::Object(object) => {
                if let Some(found) = discriminator(object) {
                    let message = match found.variant {
                        Some(variant) => variant.validate(value).err().map(|e| e.to_string()),
                        None => Some(format!(
                            "no variant matches {} `{}`",
                            found.field, found.value
                        )),
                    };
                    if let Some(message) = message {
                        failures.push(FieldError {
                            location: location.clone(),
                            discriminator: Some(found),
                            message,
                        });
                    }
                }
                let children: Vec<_> = object
                    .iter()
                    .map(|(key, child)| (child, location.child(Segment::Key(key.clone()))))
                    .collect();
                stack.extend(children.into_iter().rev());
            }
            Value::Array(items) => {
                stack.extend(
                    items
                        .iter()
                        .enumerate()
                        .rev()
                        .map(|(i, child)| (child, location.child(Segment::Index(i)))),
                );
            }
            _ => {}
        }
    }

    // Failures arrive in preorder, so any failure below another one is the
    // very next entry.
    let mut deepest = Vec::with_capacity(failures.len());
    let mut failures = failures.into_iter().peekable();
    while let Some(candidate) = failures.next() {
        let has_deeper = failures
            .peek()
            .is_some_and(|next| candidate.location.is_strict_prefix_of(&next.location));
        if !has_deeper {
            deepest.push(candidate);
        }
    }

    if deepest.is_empty() {
        return vec![FieldError {
            location: Location::default(),
            discriminator: None,
            message: bulk.to_string(),
        }];
    }
    deepest
}
