pub mod description;
pub mod entity;
pub mod pathname;
pub mod types;

pub use description::*;
pub use entity::*;
pub use pathname::*;
pub use types::*;
