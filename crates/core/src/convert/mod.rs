//! Indexed tree → IR entities.
//!
//! Conversion is a worklist walk over an already indexed tree. Each node
//! yields at most one entity plus the nodes to visit next; the walk itself
//! never recurses.

mod declaration;
mod signature;

pub use signature::strip_type_suffix;

use crate::config::ConvertConfig;
use crate::error::{DocError, Result};
use crate::index::Index;
use crate::model::{Node, Project, TypeParameter};
use declscope_api::Entity;
use signature::SignatureContext;
use tracing::{debug, info, warn};

/// A node to convert, with what it inherits from whoever enqueued it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorkItem<'a> {
    pub node: &'a Node,
    /// Type parameters of the owning class, for constructors that declare
    /// none of their own
    pub inherited_type_params: &'a [TypeParameter],
}

impl<'a> WorkItem<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self {
            node,
            inherited_type_params: &[],
        }
    }
}

pub(crate) struct Conversion<'a> {
    pub entity: Option<Entity>,
    pub enqueue: Vec<WorkItem<'a>>,
}

impl<'a> Conversion<'a> {
    fn nothing() -> Self {
        Self {
            entity: None,
            enqueue: Vec::new(),
        }
    }

    fn children_of(node: &'a Node) -> Self {
        Self {
            entity: None,
            enqueue: node.decl().children.iter().map(WorkItem::new).collect(),
        }
    }
}

pub struct Converter<'i> {
    index: &'i Index,
    config: &'i ConvertConfig,
}

impl<'i> Converter<'i> {
    pub fn new(index: &'i Index, config: &'i ConvertConfig) -> Self {
        Self { index, config }
    }

    /// Convert every node reachable from the root, in document order.
    ///
    /// Nodes declared outside the analyzed tree (absolute source paths) are
    /// skipped along with everything below them.
    pub fn convert_all(&self, project: &Project) -> Result<Vec<Entity>> {
        let mut todo: Vec<WorkItem<'_>> = project.children.iter().rev().map(WorkItem::new).collect();
        let mut done = Vec::new();

        while let Some(item) = todo.pop() {
            let decl = item.node.decl();
            if decl.is_external() {
                debug!(name = %decl.name, "skipping node declared outside the analyzed tree");
                continue;
            }
            let Conversion { entity, enqueue } = self.to_ir(item)?;
            done.extend(entity);
            todo.extend(enqueue.into_iter().rev());
        }

        info!(entities = done.len(), "conversion finished");
        Ok(done)
    }

    pub(crate) fn to_ir<'a>(&self, item: WorkItem<'a>) -> Result<Conversion<'a>> {
        let node = item.node;
        match node {
            Node::Accessor(accessor) => self.accessor(accessor),
            Node::Class(class) => self.class(class),
            Node::Interface(interface) => self.interface(interface),
            Node::Constructor(callable) | Node::Method(callable) | Node::Function(callable) => {
                let ctx = SignatureContext {
                    sources: &callable.decl.sources,
                    inherited_type_params: item.inherited_type_params,
                    member: None,
                };
                let function = self.callable(&callable.signatures, &ctx)?;
                Ok(Conversion {
                    entity: function.map(Entity::Function),
                    enqueue: Vec::new(),
                })
            }
            Node::Property(member) | Node::Variable(member) => self.member(member),
            Node::TypeLiteral(literal) => {
                let ctx = SignatureContext {
                    sources: &literal.decl.sources,
                    inherited_type_params: item.inherited_type_params,
                    member: None,
                };
                let function = self.callable(&literal.signatures, &ctx)?;
                Ok(Conversion {
                    entity: function.map(Entity::Function),
                    enqueue: Vec::new(),
                })
            }
            Node::Module(_)
            | Node::Namespace(_)
            | Node::Enumeration(_)
            | Node::EnumerationMember(_)
            | Node::TypeAlias(_)
            | Node::Reference(_) => Ok(Conversion::children_of(node)),
        }
    }

    /// Report something the converter can only approximate. Fatal in strict
    /// mode.
    fn degrade(&self, what: String) -> Result<()> {
        if self.config.strict {
            return Err(DocError::UnsupportedConstruct(what));
        }
        warn!("UNIMPLEMENTED: {what}");
        Ok(())
    }
}
