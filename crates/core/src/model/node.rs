use super::comment::{Comment, Flags, Source};
use super::types::TypeExpr;
use declscope_api::MemberProperties;
use serde::Deserialize;

/// Every declaration `kindString` the model accepts inside `children`.
pub const NODE_KINDS: &[&str] = &[
    "Accessor",
    "Class",
    "Interface",
    "Constructor",
    "Method",
    "Function",
    "Property",
    "Variable",
    "Module",
    "External module",
    "Namespace",
    "Type literal",
    "Enumeration",
    "Enumeration Member",
    "Enumeration member",
    "Type alias",
    "Reference",
];

/// Values filled in by the indexer. Never read from the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Computed {
    pub path: Vec<String>,
    /// Source file of the node, or of its nearest ancestor that has one
    pub filename: String,
}

/// Fields shared by every declaration node.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Decl {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub comment: Comment,
    #[serde(default, deserialize_with = "super::stack::nested")]
    pub children: Vec<Node>,
    #[serde(skip)]
    pub computed: Computed,
}

impl Decl {
    pub fn is_external(&self) -> bool {
        self.sources.first().is_some_and(Source::is_external)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kindString")]
pub enum Node {
    Accessor(Accessor),
    Class(ClassLike),
    Interface(ClassLike),
    Constructor(Callable),
    Method(Callable),
    Function(Callable),
    Property(Member),
    Variable(Member),
    #[serde(rename = "Module", alias = "External module")]
    Module(ModuleDecl),
    Namespace(Other),
    #[serde(rename = "Type literal")]
    TypeLiteral(TypeLiteral),
    Enumeration(Other),
    #[serde(rename = "Enumeration Member", alias = "Enumeration member")]
    EnumerationMember(Other),
    #[serde(rename = "Type alias")]
    TypeAlias(Other),
    Reference(Other),
}

impl Node {
    pub fn kind_string(&self) -> &'static str {
        match self {
            Node::Accessor(_) => "Accessor",
            Node::Class(_) => "Class",
            Node::Interface(_) => "Interface",
            Node::Constructor(_) => "Constructor",
            Node::Method(_) => "Method",
            Node::Function(_) => "Function",
            Node::Property(_) => "Property",
            Node::Variable(_) => "Variable",
            Node::Module(_) => "Module",
            Node::Namespace(_) => "Namespace",
            Node::TypeLiteral(_) => "Type literal",
            Node::Enumeration(_) => "Enumeration",
            Node::EnumerationMember(_) => "Enumeration Member",
            Node::TypeAlias(_) => "Type alias",
            Node::Reference(_) => "Reference",
        }
    }

    pub fn decl(&self) -> &Decl {
        match self {
            Node::Accessor(n) => &n.decl,
            Node::Class(n) | Node::Interface(n) => &n.decl,
            Node::Constructor(n) | Node::Method(n) | Node::Function(n) => &n.decl,
            Node::Property(n) | Node::Variable(n) => &n.decl,
            Node::Module(n) => &n.decl,
            Node::TypeLiteral(n) => &n.decl,
            Node::Namespace(n)
            | Node::Enumeration(n)
            | Node::EnumerationMember(n)
            | Node::TypeAlias(n)
            | Node::Reference(n) => &n.decl,
        }
    }

    pub fn decl_mut(&mut self) -> &mut Decl {
        match self {
            Node::Accessor(n) => &mut n.decl,
            Node::Class(n) | Node::Interface(n) => &mut n.decl,
            Node::Constructor(n) | Node::Method(n) | Node::Function(n) => &mut n.decl,
            Node::Property(n) | Node::Variable(n) => &mut n.decl,
            Node::Module(n) => &mut n.decl,
            Node::TypeLiteral(n) => &mut n.decl,
            Node::Namespace(n)
            | Node::Enumeration(n)
            | Node::EnumerationMember(n)
            | Node::TypeAlias(n)
            | Node::Reference(n) => &mut n.decl,
        }
    }

    pub fn name(&self) -> &str {
        &self.decl().name
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Node::Module(_))
    }
}

/// `Constructor`, `Method` and `Function`: all the substance lives in the
/// signatures.
#[derive(Deserialize, Debug, Clone)]
pub struct Callable {
    #[serde(flatten)]
    pub decl: Decl,
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    #[serde(flatten)]
    pub decl: Decl,
    #[serde(default)]
    pub get_signature: Option<Box<Signature>>,
    #[serde(default)]
    pub set_signature: Option<Box<Signature>>,
}

/// `Class` or `Interface`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClassLike {
    #[serde(flatten)]
    pub decl: Decl,
    #[serde(default)]
    pub extended_types: Vec<TypeExpr>,
    #[serde(default)]
    pub implemented_types: Vec<TypeExpr>,
    #[serde(default, alias = "typeParameter")]
    pub type_parameters: Vec<TypeParameter>,
}

/// `Property` or `Variable`.
#[derive(Deserialize, Debug, Clone)]
pub struct Member {
    #[serde(flatten)]
    pub decl: Decl,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

impl Member {
    /// The type literal behind this member's type when it is callable.
    pub fn callable_literal(&self) -> Option<&TypeLiteral> {
        match self.ty.reflected()? {
            Node::TypeLiteral(lit) if !lit.signatures.is_empty() => Some(lit),
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModuleDecl {
    #[serde(flatten)]
    pub decl: Decl,
}

/// Synthetic declaration behind an anonymous object or function type.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TypeLiteral {
    #[serde(flatten)]
    pub decl: Decl,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub signatures: Vec<Signature>,
    #[serde(default)]
    pub index_signature: Option<Box<Signature>>,
}

/// Recognised kinds that produce no entity of their own.
#[derive(Deserialize, Debug, Clone)]
pub struct Other {
    #[serde(flatten)]
    pub decl: Decl,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    #[serde(rename = "Constructor signature")]
    Constructor,
    #[serde(rename = "Call signature")]
    Call,
    #[serde(rename = "Get signature")]
    Get,
    #[serde(rename = "Set signature")]
    Set,
    #[serde(rename = "Index signature")]
    Index,
}

impl SignatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureKind::Constructor => "Constructor signature",
            SignatureKind::Call => "Call signature",
            SignatureKind::Get => "Get signature",
            SignatureKind::Set => "Set signature",
            SignatureKind::Index => "Index signature",
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "kindString")]
    pub kind: SignatureKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub comment: Comment,
    #[serde(default, alias = "typeParameter")]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub parameters: Vec<Param>,
    /// Return type
    #[serde(default, rename = "type")]
    pub ty: Option<TypeExpr>,
    #[serde(default)]
    pub inherited_from: Option<serde_json::Value>,
    #[serde(skip)]
    pub computed: Computed,
    #[serde(skip)]
    pub parent_member_properties: MemberProperties,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub comment: Comment,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(skip)]
    pub computed: Computed,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TypeParameter {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    /// Constraint (`extends`)
    #[serde(default, rename = "type", alias = "constraint")]
    pub ty: Option<TypeExpr>,
    #[serde(default)]
    pub comment: Comment,
    #[serde(skip)]
    pub computed: Computed,
}

/// Root of an analysis-tool document.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Project {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(skip)]
    pub computed: Computed,
}
