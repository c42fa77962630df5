//! Domain entity models for UrPearl SHOP.
//!
//! Each submodule pairs a database-backed model with the enums and
//! derived read models that belong to it. Entities carry no I/O; all
//! persistence lives in `urpearl-database` and all business rules in
//! `urpearl-service`.

pub mod cart;
pub mod category;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod product;
pub mod rating;
pub mod user;

pub use cart::{CartItem, CartLine};
pub use category::Category;
pub use inventory::{Inventory, InventoryStats, DEFAULT_LOW_STOCK_THRESHOLD};
pub use notification::{Notification, NotificationKind};
pub use order::{NewOrderItem, Order, OrderItem, OrderStats, OrderStatus, ShippingAddress};
pub use product::{CreateProduct, Product, ProductSummary, StockStatus, UpdateProduct};
pub use rating::{Rating, RatingSummary, RatingWithAuthor};
pub use user::{Role, UpsertUser, User};
