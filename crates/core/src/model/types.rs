use super::node::Node;
use super::stack;
use serde::de::value::{MapAccessDeserializer, StringDeserializer};
use serde::de::{DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Every `type` discriminator value the model accepts.
pub const TYPE_KINDS: &[&str] = &[
    "intrinsic",
    "reference",
    "array",
    "tuple",
    "union",
    "intersection",
    "typeOperator",
    "literal",
    "predicate",
    "reflection",
    "typeParameter",
    "unknown",
    "indexedAccess",
    "conditional",
    "query",
    "mapped",
    "template-literal",
    "inferred",
    "optional",
    "rest",
    "named-tuple-member",
];

/// A type expression. Generic arguments apply on top of any variant.
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeKind,
    pub type_arguments: Vec<TypeExpr>,
}

impl<'de> Deserialize<'de> for TypeExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        stack::grow(|| deserializer.deserialize_map(TypeExprVisitor))
    }
}

struct TypeExprVisitor;

impl<'de> Visitor<'de> for TypeExprVisitor {
    type Value = TypeExpr;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a type expression object")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<TypeExpr, A::Error> {
        let mut type_arguments = None;
        let kind = TypeKind::deserialize(MapAccessDeserializer::new(WithoutTypeArguments {
            inner: map,
            type_arguments: &mut type_arguments,
        }))?;
        Ok(TypeExpr {
            kind,
            type_arguments: type_arguments.unwrap_or_default(),
        })
    }
}

/// Hands every entry but `typeArguments` on to the variant.
///
/// Splitting the map while it streams keeps each level's entries owned, where
/// a flattened field would buffer and copy the whole subtree once per level.
struct WithoutTypeArguments<'s, A> {
    inner: A,
    type_arguments: &'s mut Option<Vec<TypeExpr>>,
}

impl<'de, A: MapAccess<'de>> MapAccess<'de> for WithoutTypeArguments<'_, A> {
    type Error = A::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, A::Error> {
        while let Some(key) = self.inner.next_key::<String>()? {
            if key == "typeArguments" {
                *self.type_arguments = self.inner.next_value()?;
                continue;
            }
            let key: StringDeserializer<A::Error> = key.into_deserializer();
            return seed.deserialize(key).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, A::Error> {
        self.inner.next_value_seed(seed)
    }
}

impl Drop for TypeExpr {
    // Unnest first so a deep expression never drops recursively.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_nested(&mut pending);
        while let Some(mut ty) = pending.pop() {
            ty.detach_nested(&mut pending);
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeKind {
    Intrinsic {
        name: String,
    },
    Reference(ReferenceType),
    Array {
        #[serde(rename = "elementType")]
        element_type: Box<TypeExpr>,
    },
    Tuple {
        #[serde(default)]
        elements: Vec<TypeExpr>,
    },
    Union {
        types: Vec<TypeExpr>,
    },
    Intersection {
        types: Vec<TypeExpr>,
    },
    TypeOperator {
        operator: String,
        target: Box<TypeExpr>,
    },
    Literal {
        #[serde(default)]
        value: serde_json::Value,
    },
    Predicate {
        name: String,
        #[serde(default)]
        asserts: bool,
        #[serde(default, rename = "targetType")]
        target_type: Option<Box<TypeExpr>>,
    },
    Reflection {
        #[serde(deserialize_with = "stack::nested")]
        declaration: Box<Node>,
    },
    TypeParameter {
        name: String,
    },
    Unknown {
        name: String,
    },
    // Recognised, not modelled: rendered as a placeholder.
    IndexedAccess,
    Conditional,
    Query,
    Mapped,
    #[serde(rename = "template-literal")]
    TemplateLiteral,
    Inferred,
    Optional,
    Rest,
    #[serde(rename = "named-tuple-member")]
    NamedTupleMember,
}

impl TypeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            TypeKind::Intrinsic { .. } => "intrinsic",
            TypeKind::Reference(_) => "reference",
            TypeKind::Array { .. } => "array",
            TypeKind::Tuple { .. } => "tuple",
            TypeKind::Union { .. } => "union",
            TypeKind::Intersection { .. } => "intersection",
            TypeKind::TypeOperator { .. } => "typeOperator",
            TypeKind::Literal { .. } => "literal",
            TypeKind::Predicate { .. } => "predicate",
            TypeKind::Reflection { .. } => "reflection",
            TypeKind::TypeParameter { .. } => "typeParameter",
            TypeKind::Unknown { .. } => "unknown",
            TypeKind::IndexedAccess => "indexedAccess",
            TypeKind::Conditional => "conditional",
            TypeKind::Query => "query",
            TypeKind::Mapped => "mapped",
            TypeKind::TemplateLiteral => "template-literal",
            TypeKind::Inferred => "inferred",
            TypeKind::Optional => "optional",
            TypeKind::Rest => "rest",
            TypeKind::NamedTupleMember => "named-tuple-member",
        }
    }
}

impl TypeExpr {
    fn detach_nested(&mut self, out: &mut Vec<TypeExpr>) {
        out.append(&mut self.type_arguments);
        match std::mem::replace(&mut self.kind, TypeKind::Inferred) {
            TypeKind::Array { element_type: inner }
            | TypeKind::TypeOperator { target: inner, .. }
            | TypeKind::Predicate {
                target_type: Some(inner),
                ..
            } => out.push(*inner),
            TypeKind::Tuple { elements: types }
            | TypeKind::Union { types }
            | TypeKind::Intersection { types } => out.extend(types),
            _ => {}
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(&self.kind, TypeKind::Intrinsic { name } if name == "void")
    }

    /// The declaration behind a reflected anonymous type, if any.
    pub fn reflected(&self) -> Option<&Node> {
        match &self.kind {
            TypeKind::Reflection { declaration } => Some(declaration),
            _ => None,
        }
    }

    pub fn reflected_mut(&mut self) -> Option<&mut Node> {
        match &mut self.kind {
            TypeKind::Reflection { declaration } => Some(declaration),
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReferenceType {
    pub name: String,
    #[serde(default)]
    pub target: Option<RefTarget>,
    /// Older tool versions put the target id here instead of `target`.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default, rename = "refersToTypeParameter")]
    pub refers_to_type_parameter: bool,
}

impl ReferenceType {
    /// Id of the referenced node. Zero, negative or absent ids mean the tool
    /// had nothing to point at.
    pub fn target_id(&self) -> Option<i64> {
        let id = match &self.target {
            Some(RefTarget::Id(id)) => Some(*id),
            _ => self.id,
        };
        id.filter(|id| *id > 0)
    }

    pub fn external_target(&self) -> Option<&ExternalTarget> {
        match &self.target {
            Some(RefTarget::External(target)) => Some(target),
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RefTarget {
    Id(i64),
    External(ExternalTarget),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExternalTarget {
    #[serde(rename = "sourceFileName")]
    pub source_file_name: String,
    #[serde(rename = "qualifiedName")]
    pub qualified_name: String,
}
