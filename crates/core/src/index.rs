//! Id-keyed table of every identified node, built in one pass.
//!
//! The pass is also the only place the parsed tree is written to: each node
//! gets its computed path and filename here.

use crate::model::{
    Accessor, Callable, ClassLike, Computed, Member, ModuleDecl, Node, Other, Param, Project,
    Signature, TypeLiteral, TypeParameter,
};
use crate::path::{compute_path, own_segments};
use declscope_api::MemberProperties;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

/// What conversion needs to know about a node it only has an id for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedNode {
    pub kind: &'static str,
    pub name: String,
    pub path: Vec<String>,
    pub parent: Option<i64>,
    pub filename: String,
    /// Declared outside the analyzed tree
    pub external: bool,
}

#[derive(Debug, Default)]
pub struct Index {
    nodes: HashMap<i64, IndexedNode>,
}

impl Index {
    pub fn get(&self, id: i64) -> Option<&IndexedNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, id: i64, node: IndexedNode) {
        if let Some(previous) = self.nodes.insert(id, node) {
            debug!(id, kind = previous.kind, "id seen twice; keeping the later node");
        }
    }
}

struct Parent {
    id: Option<i64>,
    kind: &'static str,
    path: Vec<String>,
    filename: String,
    properties: MemberProperties,
}

/// A node-like thing that can carry an id.
enum Slot<'a> {
    Node(&'a mut Node),
    Signature(&'a mut Signature),
    Param(&'a mut Param),
    TypeParameter(&'a mut TypeParameter),
}

struct SlotInfo {
    id: Option<i64>,
    kind: &'static str,
    name: String,
    own: Vec<String>,
    is_module: bool,
    is_static: bool,
    source: Option<String>,
    external: bool,
    properties: MemberProperties,
}

impl<'a> Slot<'a> {
    fn info(&self, base_dir: &Path) -> SlotInfo {
        match self {
            Slot::Node(node) => {
                let decl = node.decl();
                let source = decl.sources.first();
                SlotInfo {
                    id: decl.id,
                    kind: node.kind_string(),
                    name: decl.name.clone(),
                    own: own_segments(node, base_dir),
                    is_module: node.is_module(),
                    is_static: decl.flags.is_static,
                    source: source.map(|s| s.file_name.clone()),
                    external: source.is_some_and(|s| s.is_external()),
                    properties: decl.flags.member_properties(),
                }
            }
            Slot::Signature(sig) => {
                let source = sig.sources.first();
                SlotInfo {
                    id: sig.id,
                    kind: sig.kind.as_str(),
                    name: sig.name.clone(),
                    own: Vec::new(),
                    is_module: false,
                    is_static: sig.flags.is_static,
                    source: source.map(|s| s.file_name.clone()),
                    external: source.is_some_and(|s| s.is_external()),
                    properties: sig.flags.member_properties(),
                }
            }
            Slot::Param(param) => SlotInfo {
                id: param.id,
                kind: "Parameter",
                name: param.name.clone(),
                own: Vec::new(),
                is_module: false,
                is_static: param.flags.is_static,
                source: None,
                external: false,
                properties: param.flags.member_properties(),
            },
            Slot::TypeParameter(tp) => SlotInfo {
                id: tp.id,
                kind: "Type parameter",
                name: tp.name.clone(),
                own: Vec::new(),
                is_module: false,
                is_static: false,
                source: None,
                external: false,
                properties: MemberProperties::default(),
            },
        }
    }

    /// Store the computed values and collect everything below this slot that
    /// may carry an id, in document order.
    fn descend(self, computed: Computed, parent: &Parent, out: &mut Vec<Slot<'a>>) {
        match self {
            Slot::Node(node) => {
                node.decl_mut().computed = computed;
                descend_node(node, out);
            }
            Slot::Signature(sig) => {
                sig.computed = computed;
                sig.parent_member_properties = parent.properties;
                out.extend(sig.parameters.iter_mut().map(Slot::Param));
                out.extend(sig.type_parameters.iter_mut().map(Slot::TypeParameter));
            }
            Slot::Param(param) => {
                param.computed = computed;
                if let Some(declaration) = param.ty.reflected_mut() {
                    out.push(Slot::Node(declaration));
                }
            }
            Slot::TypeParameter(tp) => tp.computed = computed,
        }
    }
}

fn descend_node<'a>(node: &'a mut Node, out: &mut Vec<Slot<'a>>) {
    match node {
        Node::Accessor(Accessor {
            decl,
            get_signature,
            set_signature,
        }) => {
            out.extend(decl.children.iter_mut().map(Slot::Node));
            out.extend(get_signature.as_deref_mut().map(Slot::Signature));
            out.extend(set_signature.as_deref_mut().map(Slot::Signature));
        }
        Node::Constructor(Callable { decl, signatures })
        | Node::Method(Callable { decl, signatures })
        | Node::Function(Callable { decl, signatures }) => {
            out.extend(decl.children.iter_mut().map(Slot::Node));
            out.extend(signatures.iter_mut().map(Slot::Signature));
        }
        Node::TypeLiteral(TypeLiteral {
            decl,
            signatures,
            index_signature,
            ..
        }) => {
            out.extend(decl.children.iter_mut().map(Slot::Node));
            out.extend(signatures.iter_mut().map(Slot::Signature));
            out.extend(index_signature.as_deref_mut().map(Slot::Signature));
        }
        Node::Property(Member { decl, ty }) | Node::Variable(Member { decl, ty }) => {
            out.extend(decl.children.iter_mut().map(Slot::Node));
            if let Some(declaration) = ty.reflected_mut() {
                out.push(Slot::Node(declaration));
            }
        }
        Node::Class(ClassLike {
            decl,
            type_parameters,
            ..
        })
        | Node::Interface(ClassLike {
            decl,
            type_parameters,
            ..
        }) => {
            out.extend(decl.children.iter_mut().map(Slot::Node));
            out.extend(type_parameters.iter_mut().map(Slot::TypeParameter));
        }
        Node::Module(ModuleDecl { decl })
        | Node::Namespace(Other { decl })
        | Node::Enumeration(Other { decl })
        | Node::EnumerationMember(Other { decl })
        | Node::TypeAlias(Other { decl })
        | Node::Reference(Other { decl }) => {
            out.extend(decl.children.iter_mut().map(Slot::Node));
        }
    }
}

/// Walk the whole tree once, filling in computed paths and recording every
/// node that has an id.
///
/// Uses an explicit stack, so arbitrarily deep trees are fine.
pub fn populate_index(project: &mut Project, base_dir: &Path) -> Index {
    let mut index = Index::default();

    if let Some(id) = project.id {
        index.insert(
            id,
            IndexedNode {
                kind: "Project",
                name: project.name.clone().unwrap_or_default(),
                path: Vec::new(),
                parent: None,
                filename: String::new(),
                external: false,
            },
        );
    }
    project.computed = Computed::default();

    let root = Rc::new(Parent {
        id: project.id,
        kind: "Project",
        path: Vec::new(),
        filename: String::new(),
        properties: project.flags.member_properties(),
    });

    let mut stack: Vec<(Slot<'_>, Rc<Parent>)> = project
        .children
        .iter_mut()
        .rev()
        .map(|node| (Slot::Node(node), Rc::clone(&root)))
        .collect();

    let mut below = Vec::new();
    while let Some((slot, parent)) = stack.pop() {
        let info = slot.info(base_dir);
        let filename = info.source.unwrap_or_else(|| parent.filename.clone());
        let path = compute_path(
            info.own,
            info.is_module,
            info.is_static,
            parent.kind,
            &parent.path,
            &filename,
        );

        if let Some(id) = info.id {
            index.insert(
                id,
                IndexedNode {
                    kind: info.kind,
                    name: info.name,
                    path: path.clone(),
                    parent: parent.id,
                    filename: filename.clone(),
                    external: info.external,
                },
            );
        }

        let computed = Computed {
            path: path.clone(),
            filename: filename.clone(),
        };
        slot.descend(computed, &parent, &mut below);

        let this = Rc::new(Parent {
            id: info.id,
            kind: info.kind,
            path,
            filename,
            properties: info.properties,
        });
        stack.extend(below.drain(..).rev().map(|child| (child, Rc::clone(&this))));
    }

    debug!(nodes = index.len(), "index populated");
    index
}
