//! # urpearl-service
//!
//! Business logic service layer for UrPearl SHOP. Each service
//! orchestrates repositories and the payment provider to implement
//! application-level use cases.
//!
//! Services take their dependencies at construction time as `Arc`
//! references. They are also the only place database transactions are
//! opened; multi-step invariants (checkout, cancellation) live here.

pub mod cart;
pub mod catalog;
pub mod context;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod rating;
mod tx;
pub mod user;

pub use cart::{CartService, CartView};
pub use catalog::{CatalogService, NewProduct};
pub use context::RequestContext;
pub use inventory::{BulkInventoryOutcome, BulkInventoryUpdate, InventoryService};
pub use notification::NotificationService;
pub use order::{CheckoutIntentView, OrderService, OrderView};
pub use rating::{ProductRatingsView, RatingService};
pub use user::UserService;
