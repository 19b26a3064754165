//! Type expressions → token sequences.

use crate::error::DocError;
use crate::index::Index;
use crate::model::{Node, ReferenceType, Signature, TypeExpr, TypeKind, TypeLiteral};
use declscope_api::{Pathname, TypeExpression, TypeToken, TypeXRef};
use serde_json::Value;
use std::borrow::Cow;
use tracing::warn;

enum Frame<'a> {
    Type(&'a TypeExpr),
    Text(Cow<'a, str>),
    Token(TypeToken),
    Signature(&'a Signature),
    ObjectLiteral(&'a TypeLiteral),
}

fn text<'a>(s: impl Into<Cow<'a, str>>) -> Frame<'a> {
    Frame::Text(s.into())
}

/// Interleave groups of frames with a separator.
fn riffle<'a, I>(groups: I, separator: &'static str) -> Vec<Frame<'a>>
where
    I: IntoIterator<Item = Vec<Frame<'a>>>,
{
    let mut out = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        if i > 0 {
            out.push(text(separator));
        }
        out.extend(group);
    }
    out
}

/// Lazily yields the tokens of one type expression.
///
/// Nesting is handled by a frame stack rather than recursion, so deeply
/// nested types cannot overflow the call stack.
pub struct TypeTokens<'a> {
    index: &'a Index,
    stack: Vec<Frame<'a>>,
}

impl<'a> TypeTokens<'a> {
    pub fn new(ty: &'a TypeExpr, index: &'a Index) -> Self {
        Self {
            index,
            stack: vec![Frame::Type(ty)],
        }
    }

    fn schedule(&mut self, frames: Vec<Frame<'a>>) {
        self.stack.extend(frames.into_iter().rev());
    }

    fn expand_type(&self, ty: &'a TypeExpr) -> Vec<Frame<'a>> {
        let mut frames = match &ty.kind {
            TypeKind::Intrinsic { name }
            | TypeKind::Unknown { name }
            | TypeKind::TypeParameter { name } => vec![text(name.as_str())],
            TypeKind::Reference(reference) => vec![self.reference(reference)],
            TypeKind::Array { element_type } => vec![Frame::Type(element_type), text("[]")],
            TypeKind::Tuple { elements } => {
                let mut frames = vec![text("[")];
                frames.extend(riffle(elements.iter().map(|t| vec![Frame::Type(t)]), ", "));
                frames.push(text("]"));
                frames
            }
            TypeKind::Union { types } => riffle(types.iter().map(|t| vec![Frame::Type(t)]), "|"),
            TypeKind::Intersection { types } => {
                riffle(types.iter().map(|t| vec![Frame::Type(t)]), " & ")
            }
            TypeKind::TypeOperator { operator, target } => {
                vec![text(format!("{operator} ")), Frame::Type(target)]
            }
            TypeKind::Literal { value } => vec![text(literal(value))],
            TypeKind::Predicate {
                name,
                asserts,
                target_type,
            } => {
                let mut frames = Vec::new();
                if *asserts {
                    frames.push(text("asserts "));
                }
                frames.push(text(name.as_str()));
                if let Some(target) = target_type {
                    frames.push(text(" is "));
                    frames.push(Frame::Type(target));
                }
                frames
            }
            TypeKind::Reflection { declaration } => reflection(declaration),
            other => vec![text(format!("<unsupported: {}>", other.tag()))],
        };

        if !ty.type_arguments.is_empty() {
            frames.push(text("<"));
            frames.extend(riffle(
                ty.type_arguments.iter().map(|t| vec![Frame::Type(t)]),
                ", ",
            ));
            frames.push(text(">"));
        }
        frames
    }

    fn reference(&self, reference: &'a ReferenceType) -> Frame<'a> {
        let name = reference.name.as_str();
        if reference.refers_to_type_parameter {
            return text(name);
        }
        if let Some(id) = reference.target_id() {
            return match self.index.get(id) {
                Some(node) => Frame::Token(TypeToken::XRef(TypeXRef::Internal {
                    name: name.to_string(),
                    path: Pathname::new(node.path.clone()),
                })),
                None => {
                    let err = DocError::UnresolvedReference {
                        id,
                        name: name.to_string(),
                    };
                    warn!("{err}; rendering as plain text");
                    text(name)
                }
            };
        }
        match (reference.external_target(), &reference.package) {
            (Some(target), Some(package)) => Frame::Token(TypeToken::XRef(TypeXRef::External {
                name: name.to_string(),
                package: package.clone(),
                source_file_name: target.source_file_name.clone(),
                qualified_name: target.qualified_name.clone(),
            })),
            _ => text(name),
        }
    }
}

fn reflection(declaration: &Node) -> Vec<Frame<'_>> {
    match declaration {
        Node::TypeLiteral(literal) => match literal.signatures.first() {
            Some(sig) => vec![Frame::Signature(sig)],
            None => vec![Frame::ObjectLiteral(literal)],
        },
        Node::Constructor(callable) => match callable.signatures.first() {
            Some(sig) => vec![text("{new "), Frame::Signature(sig), text("}")],
            None => vec![text("<unsupported: reflection>")],
        },
        Node::Method(callable) | Node::Function(callable) => match callable.signatures.first() {
            Some(sig) => vec![Frame::Signature(sig)],
            None => vec![text("<unsupported: reflection>")],
        },
        _ => vec![text("<unsupported: reflection>")],
    }
}

fn signature(sig: &Signature) -> Vec<Frame<'_>> {
    let mut frames = vec![text("(")];
    frames.extend(riffle(
        sig.parameters
            .iter()
            .map(|p| vec![text(format!("{}: ", p.name)), Frame::Type(&p.ty)]),
        ", ",
    ));
    frames.push(text(") => "));
    frames.push(match &sig.ty {
        Some(ret) if !ret.is_void() => Frame::Type(ret),
        _ => text("void"),
    });
    frames
}

fn object_literal(literal: &TypeLiteral) -> Vec<Frame<'_>> {
    let mut frames = vec![text("{ ")];

    if let Some(index_sig) = &literal.index_signature {
        match index_sig.parameters.first() {
            Some(key) => {
                frames.push(text("["));
                frames.push(text(key.name.as_str()));
                frames.push(text(": "));
                frames.push(Frame::Type(&key.ty));
                frames.push(text("]: "));
                frames.push(match &index_sig.ty {
                    Some(value) => Frame::Type(value),
                    None => text("unknown"),
                });
                frames.push(text("; "));
            }
            None => warn!("index signature without a key parameter; omitted"),
        }
    }

    for child in &literal.decl.children {
        match child {
            Node::Property(member) | Node::Variable(member) => {
                frames.push(text(member.decl.name.as_str()));
                frames.push(text(if member.decl.flags.is_optional {
                    "?: "
                } else {
                    ": "
                }));
                frames.push(Frame::Type(&member.ty));
                frames.push(text("; "));
            }
            Node::Method(callable) | Node::Function(callable) => {
                if let Some(sig) = callable.signatures.first() {
                    frames.push(text(format!("{}: ", callable.decl.name)));
                    frames.push(Frame::Signature(sig));
                    frames.push(text("; "));
                }
            }
            _ => {}
        }
    }

    frames.push(text("}"));
    frames
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => value.to_string(),
        // Big integers arrive as `{"negative": bool, "value": "digits"}`.
        Value::Object(map) => match map.get("value").and_then(Value::as_str) {
            Some(digits) => {
                let negative = map.get("negative").and_then(Value::as_bool).unwrap_or(false);
                format!("{}{digits}n", if negative { "-" } else { "" })
            }
            None => "<unsupported: literal>".to_string(),
        },
        Value::Array(_) => "<unsupported: literal>".to_string(),
    }
}

impl<'a> Iterator for TypeTokens<'a> {
    type Item = TypeToken;

    fn next(&mut self) -> Option<TypeToken> {
        loop {
            let frames = match self.stack.pop()? {
                Frame::Text(s) => return Some(TypeToken::Text(s.into_owned())),
                Frame::Token(token) => return Some(token),
                Frame::Type(ty) => self.expand_type(ty),
                Frame::Signature(sig) => signature(sig),
                Frame::ObjectLiteral(literal) => object_literal(literal),
            };
            self.schedule(frames);
        }
    }
}

/// Render a type, merging adjacent text fragments.
pub fn render_type(ty: &TypeExpr, index: &Index) -> TypeExpression {
    let mut out: TypeExpression = Vec::new();
    for token in TypeTokens::new(ty, index) {
        if let TypeToken::Text(next) = &token {
            if next.is_empty() {
                continue;
            }
            if let Some(TypeToken::Text(prev)) = out.last_mut() {
                prev.push_str(next);
                continue;
            }
        }
        out.push(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::populate_index;
    use crate::model::Project;
    use declscope_api::plain_text;
    use serde_json::json;
    use std::path::Path;

    fn ty(value: Value) -> TypeExpr {
        serde_json::from_value(value).unwrap()
    }

    fn show(value: Value) -> String {
        plain_text(&render_type(&ty(value), &Index::default()))
    }

    fn intrinsic(name: &str) -> Value {
        json!({"type": "intrinsic", "name": name})
    }

    #[test]
    fn test_composite_types() {
        assert_eq!(
            show(json!({"type": "union", "types": [intrinsic("string"), intrinsic("number")]})),
            "string|number"
        );
        assert_eq!(
            show(json!({"type": "intersection", "types": [intrinsic("A"), intrinsic("B")]})),
            "A & B"
        );
        assert_eq!(
            show(json!({"type": "array", "elementType": intrinsic("number")})),
            "number[]"
        );
        assert_eq!(
            show(json!({"type": "tuple", "elements": [intrinsic("string"), intrinsic("number")]})),
            "[string, number]"
        );
        assert_eq!(
            show(json!({"type": "typeOperator", "operator": "keyof", "target": intrinsic("T")})),
            "keyof T"
        );
    }

    #[test]
    fn test_type_arguments_follow_the_root() {
        assert_eq!(
            show(json!({
                "type": "reference",
                "name": "Map",
                "typeArguments": [intrinsic("string"), {"type": "array", "elementType": intrinsic("number")}]
            })),
            "Map<string, number[]>"
        );
    }

    #[test]
    fn test_literals_and_predicates() {
        assert_eq!(show(json!({"type": "literal", "value": null})), "null");
        assert_eq!(show(json!({"type": "literal", "value": "on"})), "\"on\"");
        assert_eq!(show(json!({"type": "literal", "value": 1})), "1");
        assert_eq!(show(json!({"type": "literal", "value": true})), "true");
        assert_eq!(
            show(json!({"type": "literal", "value": {"negative": true, "value": "12"}})),
            "-12n"
        );
        assert_eq!(
            show(json!({"type": "predicate", "name": "x", "targetType": intrinsic("string")})),
            "x is string"
        );
        assert_eq!(
            show(json!({"type": "predicate", "name": "x", "asserts": true})),
            "asserts x"
        );
    }

    #[test]
    fn test_reflections() {
        let call = json!({
            "type": "reflection",
            "declaration": {
                "kindString": "Type literal",
                "name": "__type",
                "signatures": [{
                    "kindString": "Call signature",
                    "name": "__type",
                    "parameters": [
                        {"name": "a", "type": intrinsic("string")},
                        {"name": "b", "type": intrinsic("number")}
                    ],
                    "type": intrinsic("void")
                }]
            }
        });
        assert_eq!(show(call), "(a: string, b: number) => void");

        let ctor = json!({
            "type": "reflection",
            "declaration": {
                "kindString": "Constructor",
                "name": "constructor",
                "signatures": [{
                    "kindString": "Constructor signature",
                    "name": "new X",
                    "type": intrinsic("X")
                }]
            }
        });
        assert_eq!(show(ctor), "{new () => X}");

        let object = json!({
            "type": "reflection",
            "declaration": {
                "kindString": "Type literal",
                "name": "__type",
                "indexSignature": {
                    "kindString": "Index signature",
                    "name": "__index",
                    "parameters": [{"name": "k", "type": intrinsic("string")}],
                    "type": intrinsic("number")
                },
                "children": [
                    {"kindString": "Property", "name": "a", "type": intrinsic("string")},
                    {"kindString": "Property", "name": "b", "flags": {"isOptional": true}, "type": intrinsic("number")}
                ]
            }
        });
        assert_eq!(show(object), "{ [k: string]: number; a: string; b?: number; }");
    }

    #[test]
    fn test_unmodelled_types_render_a_placeholder() {
        assert_eq!(show(json!({"type": "conditional"})), "<unsupported: conditional>");
        assert_eq!(
            show(json!({"type": "template-literal"})),
            "<unsupported: template-literal>"
        );
    }

    #[test]
    fn test_references_resolve_through_the_index() {
        let mut project: Project = serde_json::from_value(json!({
            "children": [{
                "id": 7,
                "name": "Thing",
                "kindString": "Class",
                "sources": [{"fileName": "thing.ts"}]
            }]
        }))
        .unwrap();
        let index = populate_index(&mut project, Path::new("."));

        let tokens = render_type(
            &ty(json!({
                "type": "reference",
                "name": "Promise",
                "package": "typescript",
                "target": {"sourceFileName": "lib.es5.d.ts", "qualifiedName": "Promise"},
                "typeArguments": [{"type": "reference", "name": "Thing", "target": 7}]
            })),
            &index,
        );
        assert_eq!(
            tokens,
            vec![
                TypeToken::XRef(TypeXRef::External {
                    name: "Promise".into(),
                    package: "typescript".into(),
                    source_file_name: "lib.es5.d.ts".into(),
                    qualified_name: "Promise".into(),
                }),
                TypeToken::text("<"),
                TypeToken::XRef(TypeXRef::Internal {
                    name: "Thing".into(),
                    path: Pathname::parse("./thing.Thing"),
                }),
                TypeToken::text(">"),
            ]
        );

        let missing = render_type(
            &ty(json!({"type": "reference", "name": "Gone", "target": 99})),
            &index,
        );
        assert_eq!(missing, vec![TypeToken::text("Gone")]);

        let param = render_type(
            &ty(json!({"type": "reference", "name": "T", "target": 7, "refersToTypeParameter": true})),
            &index,
        );
        assert_eq!(param, vec![TypeToken::text("T")]);
    }
}
