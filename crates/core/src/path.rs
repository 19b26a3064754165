//! Path-segment computation.
//!
//! A path is a list of segments whose concatenation reads like a namepath:
//! `./dir/file.Class#method`. Directories end in `/`, containers end in `.`
//! and a class ends in `#` when the next segment is an instance member.

use crate::model::Node;
use std::path::{Component, Path};

/// Segments a node contributes on its own, before joining its parent's.
pub fn own_segments(node: &Node, base_dir: &Path) -> Vec<String> {
    match node {
        Node::Module(module) => match module.decl.original_name.as_deref() {
            Some(original) if !original.is_empty() => {
                filepath_segments(&relative_to(Path::new(original), base_dir))
            }
            _ => Vec::new(),
        },
        other => vec![other.name().to_string()],
    }
}

/// Join a node's own segments onto its parent's.
///
/// Nodes directly under the root that are not modules have no parent path to
/// hang off, so their source file stands in for one.
pub fn compute_path(
    own: Vec<String>,
    is_module: bool,
    is_static: bool,
    parent_kind: &str,
    parent_segments: &[String],
    filename: &str,
) -> Vec<String> {
    let delimiter = if !is_static && parent_kind == "Class" {
        '#'
    } else {
        '.'
    };

    let mut parent = parent_segments.to_vec();
    if parent_kind == "Project" && !is_module && parent.is_empty() {
        parent = filepath_segments(filename);
    }

    if own.is_empty() {
        return parent;
    }
    match parent.last_mut() {
        Some(last) => {
            last.push(delimiter);
            parent.extend(own);
            parent
        }
        None => own,
    }
}

/// `dir/sub/file.ts` → `["./", "dir/", "sub/", "file"]`.
pub fn filepath_segments(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    let rooted = path.starts_with("./") || path.starts_with("../") || path.starts_with('/');
    let path = if rooted {
        path.to_string()
    } else {
        format!("./{path}")
    };

    let mut parts: Vec<&str> = path.split('/').collect();
    let file = parts.pop().unwrap_or_default();
    let mut segments: Vec<String> = parts.into_iter().map(|dir| format!("{dir}/")).collect();
    segments.push(strip_extension(file).to_string());
    segments
}

fn strip_extension(file: &str) -> &str {
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}

/// Lexical `relpath`: never touches the file system.
///
/// Both sides must be absolute, or both relative, to be compared. Otherwise
/// `path` comes back whole, still rooted when it was absolute.
pub fn relative_to(path: &Path, base: &Path) -> String {
    let path_parts = normalized(path);
    let base_parts = normalized(base);

    if path.is_absolute() != base.is_absolute() {
        let joined = path_parts.join("/");
        return if path.is_absolute() {
            format!("/{joined}")
        } else {
            joined
        };
    }

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), base_parts.len() - common)
        .collect();
    parts.extend(path_parts[common..].iter().cloned());
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn normalized(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                if parts.last().is_some_and(|p| p != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts
}
