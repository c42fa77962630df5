//! Catalog management: products and categories.

mod service;

pub use service::{CatalogService, NewProduct};
