//! Typed view of the analysis tool's JSON output.
//!
//! Declarations are discriminated by `kindString`, type expressions by
//! `type`. Fields the indexer fills in are `#[serde(skip)]`.

pub mod comment;
pub mod node;
mod stack;
pub mod types;

pub use comment::{BlockTag, Comment, CommentPart, Flags, Source};
pub use node::{
    Accessor, Callable, ClassLike, Computed, Decl, Member, ModuleDecl, NODE_KINDS, Node, Other,
    Param, Project, Signature, SignatureKind, TypeLiteral, TypeParameter,
};
pub use types::{ExternalTarget, RefTarget, ReferenceType, TYPE_KINDS, TypeExpr, TypeKind};
