use super::Converter;
use super::declaration::top_level;
use crate::error::Result;
use crate::model::{
    Comment, Flags, Node, Param, Signature, SignatureKind, Source, TypeExpr, TypeKind,
    TypeParameter,
};
use crate::render::render_type;
use declscope_api::{Function, MemberProperties, Return, TypeParam};
use std::borrow::Cow;
use tracing::{debug, warn};

/// What a signature borrows from the declaration it belongs to.
pub(crate) struct SignatureContext<'a> {
    /// Sources of the owning declaration; they replace the signature's own
    pub sources: &'a [Source],
    /// Used when the signature declares no type parameters
    pub inherited_type_params: &'a [TypeParameter],
    /// Overrides the flags snapshotted from the signature's parent
    pub member: Option<MemberProperties>,
}

/// A parameter as it will be documented: either one from the signature or
/// one synthesized from a destructured object literal.
struct ParamSource<'a> {
    name: Cow<'a, str>,
    ty: &'a TypeExpr,
    comment: &'a Comment,
    default_value: Option<&'a str>,
    flags: Flags,
}

impl<'a> From<&'a Param> for ParamSource<'a> {
    fn from(param: &'a Param) -> Self {
        Self {
            name: Cow::Borrowed(&param.name),
            ty: &param.ty,
            comment: &param.comment,
            default_value: param.default_value.as_deref(),
            flags: param.flags,
        }
    }
}

/// Drop the synthetic `__type` segment of an anonymous function type and
/// return the name the remaining path now ends in.
pub fn strip_type_suffix(path: &mut Vec<String>) -> Option<String> {
    if path.last().map(String::as_str) != Some("__type") {
        return None;
    }
    path.pop();
    let last = path.last_mut()?;
    if last.ends_with('.') {
        last.pop();
    }
    Some(last.clone())
}

impl<'i> Converter<'i> {
    /// A callable is documented through its first signature only; overloads
    /// would share one path.
    pub(crate) fn callable(
        &self,
        signatures: &[Signature],
        ctx: &SignatureContext<'_>,
    ) -> Result<Option<Function>> {
        match signatures.first() {
            Some(first) => self.signature(first, ctx),
            None => Ok(None),
        }
    }

    pub(crate) fn signature(
        &self,
        sig: &Signature,
        ctx: &SignatureContext<'_>,
    ) -> Result<Option<Function>> {
        if sig.inherited_from.is_some() && sig.comment.is_empty() {
            debug!(name = %sig.name, "skipping inherited signature without its own comment");
            return Ok(None);
        }

        let mut name = match sig.name.strip_prefix('[') {
            // U+2024 looks like a period without being one.
            Some(symbol) => format!("[Symbol\u{2024}{symbol}"),
            None => sig.name.clone(),
        };
        let mut path = sig.computed.path.clone();
        if let Some(fixed) = strip_type_suffix(&mut path) {
            name = fixed;
        }

        let params = self
            .destructured_params(sig)
            .into_iter()
            .map(|p| self.param(p))
            .collect();

        let type_params = if sig.type_parameters.is_empty() {
            ctx.inherited_type_params
        } else {
            sig.type_parameters.as_slice()
        };

        Ok(Some(Function {
            top: top_level(name, path, &sig.computed.filename, ctx.sources, &sig.comment),
            member: ctx.member.unwrap_or(sig.parent_member_properties),
            is_async: self.is_async(sig),
            params,
            returns: self.returns(sig),
            type_params: self.type_params(type_params),
        }))
    }

    /// Expand parameters named by a `@destructure` tag into one parameter
    /// per property of their object-literal type.
    fn destructured_params<'s>(&self, sig: &'s Signature) -> Vec<ParamSource<'s>> {
        let targets = sig.comment.tag_text("destructure").unwrap_or_default();
        let targets: Vec<&str> = targets.split_whitespace().collect();

        let mut params = Vec::with_capacity(sig.parameters.len());
        for param in &sig.parameters {
            if !targets.contains(&param.name.as_str()) {
                params.push(ParamSource::from(param));
                continue;
            }
            match param.ty.reflected() {
                Some(Node::TypeLiteral(literal)) => {
                    for child in &literal.decl.children {
                        match child {
                            Node::Property(member) | Node::Variable(member) => {
                                params.push(ParamSource {
                                    name: Cow::Owned(format!("{}.{}", param.name, member.decl.name)),
                                    ty: &member.ty,
                                    comment: &member.decl.comment,
                                    default_value: None,
                                    flags: Flags::default(),
                                });
                            }
                            other => debug!(
                                param = %param.name,
                                kind = other.kind_string(),
                                "ignoring non-property member of destructured parameter"
                            ),
                        }
                    }
                }
                _ => {
                    warn!(
                        param = %param.name,
                        "cannot destructure a parameter whose type is not an object literal"
                    );
                    params.push(ParamSource::from(param));
                }
            }
        }
        params
    }

    fn param(&self, p: ParamSource<'_>) -> declscope_api::Param {
        declscope_api::Param {
            name: p.name.into_owned(),
            description: p.comment.description(),
            has_default: p.default_value.is_some(),
            is_variadic: p.flags.is_rest,
            ty: render_type(p.ty, self.index),
            default: p.default_value.map(str::to_string),
        }
    }

    pub(crate) fn type_params(&self, params: &[TypeParameter]) -> Vec<TypeParam> {
        params
            .iter()
            .map(|tp| TypeParam {
                name: tp.name.clone(),
                extends: tp.ty.as_ref().map(|ty| render_type(ty, self.index)),
                description: tp.comment.description(),
            })
            .collect()
    }

    fn returns(&self, sig: &Signature) -> Vec<Return> {
        if sig.kind == SignatureKind::Constructor {
            return Vec::new();
        }
        match &sig.ty {
            Some(ty) if !ty.is_void() => vec![Return {
                ty: render_type(ty, self.index),
                description: sig.comment.tag_one("returns").unwrap_or_default(),
            }],
            _ => Vec::new(),
        }
    }

    /// Syntactic guess: the declared return type is one of the configured
    /// promise wrappers.
    fn is_async(&self, sig: &Signature) -> bool {
        match sig.ty.as_ref().map(|ty| &ty.kind) {
            Some(TypeKind::Reference(reference)) => {
                self.config.async_wrappers.contains(&reference.name)
            }
            _ => false,
        }
    }
}
