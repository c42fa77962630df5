//! Shopping cart services.

mod service;

pub use service::{CartService, CartView};
pub(crate) use service::collect_stock_problems;
