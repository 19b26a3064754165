use super::signature::SignatureContext;
use super::{Conversion, Converter, WorkItem};
use crate::error::{DocError, Result};
use crate::model::{Accessor, ClassLike, Comment, Decl, Member, Node, Source, TypeExpr, TypeKind};
use crate::path::filepath_segments;
use crate::render::render_type;
use declscope_api::{
    Attribute, Class, ClassMember, Entity, Function, Interface, Pathname, TopLevel,
};
use tracing::{debug, warn};

/// Properties shared by every entity.
pub(super) fn top_level(
    name: String,
    path: Vec<String>,
    filename: &str,
    sources: &[Source],
    comment: &Comment,
) -> TopLevel {
    let known_file = !filename.is_empty();
    TopLevel {
        name,
        path: Pathname::new(path),
        filename: filename.rsplit('/').next().unwrap_or_default().to_string(),
        deppath: known_file.then(|| filename.to_string()),
        line: sources.first().map(|s| s.line),
        description: comment.description(),
        deprecated: comment.deprecation(),
        examples: comment.tag_list("example"),
        exported_from: known_file.then(|| Pathname::new(filepath_segments(filename))),
    }
}

fn decl_top_level(decl: &Decl, comment: &Comment) -> TopLevel {
    top_level(
        decl.name.clone(),
        decl.computed.path.clone(),
        &decl.computed.filename,
        &decl.sources,
        comment,
    )
}

impl<'i> Converter<'i> {
    pub(super) fn accessor<'a>(&self, accessor: &'a Accessor) -> Result<Conversion<'a>> {
        let getter_type = accessor
            .get_signature
            .as_ref()
            .and_then(|sig| sig.ty.as_ref());
        let setter_type = accessor
            .set_signature
            .as_ref()
            .and_then(|sig| sig.parameters.first())
            .map(|param| &param.ty);

        let Some(ty) = getter_type.or(setter_type) else {
            self.degrade(format!(
                "accessor `{}` has neither a getter type nor a setter parameter",
                accessor.decl.name
            ))?;
            return Ok(Conversion::nothing());
        };

        // Authors often document the getter or setter rather than the pair.
        let comment = [
            Some(&accessor.decl.comment),
            accessor.get_signature.as_ref().map(|sig| &sig.comment),
            accessor.set_signature.as_ref().map(|sig| &sig.comment),
        ]
        .into_iter()
        .flatten()
        .find(|comment| !comment.is_empty())
        .unwrap_or(&accessor.decl.comment);

        let attribute = Attribute {
            top: decl_top_level(&accessor.decl, comment),
            member: accessor.decl.flags.member_properties(),
            ty: render_type(ty, self.index),
        };
        Ok(Conversion {
            entity: Some(Entity::Attribute(attribute)),
            enqueue: accessor.decl.children.iter().map(WorkItem::new).collect(),
        })
    }

    pub(super) fn member<'a>(&self, member: &'a Member) -> Result<Conversion<'a>> {
        if let Some(literal) = member.callable_literal() {
            let sources = if literal.decl.sources.is_empty() {
                &member.decl.sources
            } else {
                &literal.decl.sources
            };
            let ctx = SignatureContext {
                sources,
                inherited_type_params: &[],
                member: Some(member.decl.flags.member_properties()),
            };
            let function = self.callable(&literal.signatures, &ctx)?;
            return Ok(Conversion {
                entity: function.map(Entity::Function),
                enqueue: Vec::new(),
            });
        }

        let attribute = Attribute {
            top: decl_top_level(&member.decl, &member.decl.comment),
            member: member.decl.flags.member_properties(),
            ty: render_type(&member.ty, self.index),
        };
        Ok(Conversion {
            entity: Some(Entity::Attribute(attribute)),
            enqueue: member.decl.children.iter().map(WorkItem::new).collect(),
        })
    }

    pub(super) fn class<'a>(&self, class: &'a ClassLike) -> Result<Conversion<'a>> {
        let (constructor, members) = self.constructor_and_members(class)?;
        let entity = Class {
            top: decl_top_level(&class.decl, &class.decl.comment),
            constructor,
            members,
            supers: self.related_types(&class.extended_types, "superclass")?,
            interfaces: self.related_types(&class.implemented_types, "implemented interface")?,
            is_abstract: class.decl.flags.is_abstract,
            type_params: self.type_params(&class.type_parameters),
        };

        // Constructors go first so the standalone constructor entity lands
        // right after its class.
        let (constructors, rest): (Vec<&Node>, Vec<&Node>) = class
            .decl
            .children
            .iter()
            .partition(|child| matches!(child, Node::Constructor(_)));
        let enqueue = constructors
            .into_iter()
            .map(|node| WorkItem {
                node,
                inherited_type_params: &class.type_parameters,
            })
            .chain(rest.into_iter().map(WorkItem::new))
            .collect();

        Ok(Conversion {
            entity: Some(Entity::Class(entity)),
            enqueue,
        })
    }

    pub(super) fn interface<'a>(&self, interface: &'a ClassLike) -> Result<Conversion<'a>> {
        let (_, members) = self.constructor_and_members(interface)?;
        let entity = Interface {
            top: decl_top_level(&interface.decl, &interface.decl.comment),
            members,
            supers: self.related_types(&interface.extended_types, "extended interface")?,
            type_params: self.type_params(&interface.type_parameters),
        };
        Ok(Conversion {
            entity: Some(Entity::Interface(entity)),
            enqueue: interface.decl.children.iter().map(WorkItem::new).collect(),
        })
    }

    /// At most one constructor survives: TypeScript allows a single
    /// implementation however many overloads it has.
    fn constructor_and_members(
        &self,
        class: &ClassLike,
    ) -> Result<(Option<Function>, Vec<ClassMember>)> {
        let mut constructor = None;
        let mut members = Vec::new();

        for child in &class.decl.children {
            if let Node::Constructor(callable) = child {
                if constructor.is_some() {
                    debug!(class = %class.decl.name, "ignoring additional constructor");
                    continue;
                }
                let ctx = SignatureContext {
                    sources: &callable.decl.sources,
                    inherited_type_params: &class.type_parameters,
                    member: None,
                };
                constructor = self.callable(&callable.signatures, &ctx)?;
                continue;
            }

            match self.to_ir(WorkItem::new(child))?.entity {
                Some(Entity::Function(function)) => members.push(ClassMember::Function(function)),
                Some(Entity::Attribute(attribute)) => {
                    members.push(ClassMember::Attribute(attribute))
                }
                Some(other) => debug!(
                    class = %class.decl.name,
                    kind = other.kind(),
                    "nested declaration is not a class member"
                ),
                None => {}
            }
        }
        Ok((constructor, members))
    }

    /// Paths of the declarations a class extends or implements.
    fn related_types(&self, types: &[TypeExpr], relation: &str) -> Result<Vec<Pathname>> {
        let mut paths = Vec::new();
        for ty in types {
            let TypeKind::Reference(reference) = &ty.kind else {
                self.degrade(format!("{relation} given as a `{}` type", ty.kind.tag()))?;
                continue;
            };
            match reference.target_id() {
                Some(id) => match self.index.get(id) {
                    Some(node) => paths.push(Pathname::new(node.path.clone())),
                    None => {
                        let err = DocError::UnresolvedReference {
                            id,
                            name: reference.name.clone(),
                        };
                        warn!("{err}; {relation} omitted");
                    }
                },
                None if reference.package.is_some() || reference.external_target().is_some() => {
                    debug!(name = %reference.name, "skipping {relation} from another package");
                }
                None => self.degrade(format!(
                    "{relation} `{}` does not point at a declaration",
                    reference.name
                ))?,
            }
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_file_properties() {
        let top = top_level(
            "f".into(),
            vec!["./".into(), "dir/".into(), "file.".into(), "f".into()],
            "dir/file.ts",
            &[Source {
                file_name: "dir/file.ts".into(),
                line: 12,
            }],
            &Comment::default(),
        );
        assert_eq!(top.filename, "file.ts");
        assert_eq!(top.deppath.as_deref(), Some("dir/file.ts"));
        assert_eq!(top.line, Some(12));
        assert_eq!(top.exported_from, Some(Pathname::parse("./dir/file")));
        assert!(!top.deprecated.is_deprecated());
    }

    #[test]
    fn test_top_level_without_a_file() {
        let top = top_level("x".into(), vec!["x".into()], "", &[], &Comment::default());
        assert_eq!(top.filename, "");
        assert_eq!(top.deppath, None);
        assert_eq!(top.line, None);
        assert_eq!(top.exported_from, None);
    }
}
