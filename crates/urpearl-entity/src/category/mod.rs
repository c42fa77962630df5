//! Product category entity.

mod model;

pub use model::{slugify, Category};
