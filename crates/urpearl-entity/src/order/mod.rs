//! Order entities, status machine and shipping address.

mod address;
mod model;
mod status;

pub use address::ShippingAddress;
pub use model::{NewOrderItem, Order, OrderItem, OrderStats};
pub use status::OrderStatus;
