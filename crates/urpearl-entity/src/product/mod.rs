//! Product entity and stock status.

mod model;
mod status;

pub use model::{CreateProduct, Product, ProductSummary, UpdateProduct};
pub use status::StockStatus;
