use crate::parse::SchemaMismatch;
use crate::suffix_tree::LookupError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("JSON syntax error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),
    #[error("Unresolved reference: `{name}` points at id {id}, which is not in the index")]
    UnresolvedReference { id: i64, name: String },
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub type Result<T> = std::result::Result<T, DocError>;
