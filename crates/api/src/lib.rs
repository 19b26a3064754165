//! Renderer-agnostic intermediate representation of documented declarations.
//!
//! Everything in this crate is plain data: it owns its contents, holds no
//! references back into the analysis-tool tree it was converted from, and
//! serializes to JSON (with a matching JSON Schema) for downstream renderers.

pub mod models;

pub use models::*;
