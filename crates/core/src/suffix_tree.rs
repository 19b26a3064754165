//! Lookup of values by any trailing run of their path segments.

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No object found with path suffix `{suffix}`")]
    SuffixNotFound { suffix: String },
    #[error(
        "Path suffix `{suffix}` is ambiguous; it matches: {}",
        .candidates.join(", ")
    )]
    SuffixAmbiguous {
        suffix: String,
        candidates: Vec<String>,
    },
    #[error("Path `{path}` was added twice")]
    DuplicatePath { path: String },
}

#[derive(Debug)]
struct TreeNode<T> {
    /// Set when a full path ends exactly here
    entry: Option<(Vec<String>, T)>,
    children: IndexMap<String, TreeNode<T>>,
    /// Number of entries at or below this node
    count: usize,
}

impl<T> Default for TreeNode<T> {
    fn default() -> Self {
        Self {
            entry: None,
            children: IndexMap::new(),
            count: 0,
        }
    }
}

/// A reverse trie: paths are inserted last segment first, so walking a
/// suffix from its end lands on the node under which every matching path
/// lives.
#[derive(Debug)]
pub struct SuffixTree<T> {
    root: TreeNode<T>,
}

impl<T> Default for SuffixTree<T> {
    fn default() -> Self {
        Self {
            root: TreeNode::default(),
        }
    }
}

impl<T> SuffixTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.root.count
    }

    pub fn is_empty(&self) -> bool {
        self.root.count == 0
    }

    /// Insert one full path. Fails without touching the tree if the exact
    /// path is already present.
    pub fn add(&mut self, segments: Vec<String>, value: T) -> Result<(), LookupError> {
        if self.find(segments.as_slice()).is_some_and(|node| node.entry.is_some()) {
            return Err(LookupError::DuplicatePath {
                path: segments.concat(),
            });
        }

        let mut node = &mut self.root;
        node.count += 1;
        for segment in segments.iter().rev() {
            node = node.children.entry(segment.clone()).or_default();
            node.count += 1;
        }
        node.entry = Some((segments, value));
        Ok(())
    }

    /// Insert many paths, stopping at the first duplicate.
    pub fn add_many<I>(&mut self, pairs: I) -> Result<(), LookupError>
    where
        I: IntoIterator<Item = (Vec<String>, T)>,
    {
        for (segments, value) in pairs {
            self.add(segments, value)?;
        }
        Ok(())
    }

    fn find<S: AsRef<str>>(&self, suffix: &[S]) -> Option<&TreeNode<T>> {
        let mut node = &self.root;
        for segment in suffix.iter().rev() {
            node = node.children.get(segment.as_ref())?;
        }
        Some(node)
    }

    /// The unique value whose path ends with `suffix`.
    ///
    /// A path equal to the whole suffix wins over longer paths that merely
    /// end with it.
    pub fn get<S: AsRef<str>>(&self, suffix: &[S]) -> Result<&T, LookupError> {
        let joined = || suffix.iter().map(AsRef::as_ref).collect::<String>();

        let Some(node) = self.find(suffix) else {
            return Err(LookupError::SuffixNotFound { suffix: joined() });
        };
        if let Some((_, value)) = &node.entry {
            return Ok(value);
        }

        match node.count {
            0 => Err(LookupError::SuffixNotFound { suffix: joined() }),
            1 => node
                .entries()
                .next()
                .map(|(_, value)| value)
                .ok_or_else(|| LookupError::SuffixNotFound { suffix: joined() }),
            _ => {
                let mut candidates: Vec<String> =
                    node.entries().map(|(path, _)| path.concat()).collect();
                candidates.sort();
                Err(LookupError::SuffixAmbiguous {
                    suffix: joined(),
                    candidates,
                })
            }
        }
    }
}

impl<T> TreeNode<T> {
    /// Every entry at or below this node.
    fn entries(&self) -> impl Iterator<Item = (&[String], &T)> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                stack.extend(node.children.values().filter(|child| child.count > 0));
                if let Some((path, value)) = &node.entry {
                    return Some((path.as_slice(), value));
                }
            }
            None
        })
    }
}
