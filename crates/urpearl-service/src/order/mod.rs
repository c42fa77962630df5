//! Order placement, checkout, and lifecycle management.

mod service;

pub use service::{CheckoutIntentView, OrderService, OrderView};
