use super::description::{Description, Deprecation};
use super::pathname::Pathname;
use super::types::TypeExpression;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Properties every documented entity shares.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct TopLevel {
    /// Short name, as written in the source
    pub name: String,
    pub path: Pathname,
    /// Basename of the defining source file
    pub filename: String,
    /// Source file name as reported by the analysis tool
    pub deppath: Option<String>,
    pub line: Option<u32>,
    pub description: Description,
    pub deprecated: Deprecation,
    pub examples: Vec<Description>,
    /// File-path pathname of the module the entity is exported from
    pub exported_from: Option<Pathname>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct MemberProperties {
    pub is_abstract: bool,
    pub is_optional: bool,
    pub is_static: bool,
    pub is_private: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Param {
    pub name: String,
    pub description: Description,
    pub has_default: bool,
    pub is_variadic: bool,
    #[serde(rename = "type")]
    pub ty: TypeExpression,
    pub default: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Return {
    #[serde(rename = "type")]
    pub ty: TypeExpression,
    pub description: Description,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct TypeParam {
    pub name: String,
    pub extends: Option<TypeExpression>,
    pub description: Description,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Function {
    #[serde(flatten)]
    pub top: TopLevel,
    #[serde(flatten)]
    pub member: MemberProperties,
    /// Set when the declared return type names a promise wrapper. This is a
    /// syntactic guess, not a statement about the implementation.
    pub is_async: bool,
    pub params: Vec<Param>,
    pub returns: Vec<Return>,
    pub type_params: Vec<TypeParam>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Attribute {
    #[serde(flatten)]
    pub top: TopLevel,
    #[serde(flatten)]
    pub member: MemberProperties,
    #[serde(rename = "type")]
    pub ty: TypeExpression,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassMember {
    Function(Function),
    Attribute(Attribute),
}

impl ClassMember {
    pub fn top(&self) -> &TopLevel {
        match self {
            ClassMember::Function(f) => &f.top,
            ClassMember::Attribute(a) => &a.top,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Class {
    #[serde(flatten)]
    pub top: TopLevel,
    pub constructor: Option<Function>,
    pub members: Vec<ClassMember>,
    pub supers: Vec<Pathname>,
    pub interfaces: Vec<Pathname>,
    pub is_abstract: bool,
    pub type_params: Vec<TypeParam>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Interface {
    #[serde(flatten)]
    pub top: TopLevel,
    pub members: Vec<ClassMember>,
    pub supers: Vec<Pathname>,
    pub type_params: Vec<TypeParam>,
}

/// A converted, documentable entity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Function(Function),
    Class(Class),
    Interface(Interface),
    Attribute(Attribute),
}

impl Entity {
    pub fn top(&self) -> &TopLevel {
        match self {
            Entity::Function(f) => &f.top,
            Entity::Class(c) => &c.top,
            Entity::Interface(i) => &i.top,
            Entity::Attribute(a) => &a.top,
        }
    }

    pub fn name(&self) -> &str {
        &self.top().name
    }

    pub fn path(&self) -> &Pathname {
        &self.top().path
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Function(_) => "function",
            Entity::Class(_) => "class",
            Entity::Interface(_) => "interface",
            Entity::Attribute(_) => "attribute",
        }
    }
}
