//! Cart entities.

mod model;

pub use model::{CartItem, CartLine};
