//! Repository implementations for all UrPearl SHOP entities.

pub mod cart;
pub mod category;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod product;
pub mod rating;
pub mod user;

pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use inventory::{InventoryRepository, LowStockRow};
pub use notification::NotificationRepository;
pub use order::{OrderFilter, OrderLineInsert, OrderRepository};
pub use product::{ProductFilter, ProductRepository, ProductSort};
pub use rating::RatingRepository;
pub use user::UserRepository;
