//! Admin back-office handlers.

pub mod categories;
pub mod inventory;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod stats;
