use std::path::PathBuf;

/// Knobs for one index-and-convert run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory module paths are made relative to.
    pub base_dir: PathBuf,
    /// Reference type names that mark a function as async when they wrap its
    /// return type.
    pub async_wrappers: Vec<String>,
    /// Turn non-fatal degradations (unsupported supers, malformed accessors,
    /// colliding paths) into errors.
    pub strict: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            async_wrappers: vec!["Promise".to_string()],
            strict: false,
        }
    }
}

impl ConvertConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the promise wrapper names. An empty list keeps the default.
    pub fn with_async_wrappers(mut self, wrappers: Vec<String>) -> Self {
        if !wrappers.is_empty() {
            self.async_wrappers = wrappers;
        }
        self
    }
}
