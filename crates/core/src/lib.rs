pub mod analyzer;
pub mod config;
pub mod convert;
pub mod error;
pub mod index;
pub mod model;
pub mod parse;
pub mod path;
pub mod render;
pub mod suffix_tree;

pub use analyzer::{Analyzer, index_and_convert};
pub use config::ConvertConfig;
pub use error::{DocError, Result};
pub use parse::{FieldError, SchemaMismatch, parse, parse_str};
pub use suffix_tree::{LookupError, SuffixTree};
