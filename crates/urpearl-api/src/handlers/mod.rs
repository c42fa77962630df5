//! Route handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod category;
pub mod checkout;
pub mod health;
pub mod order;
pub mod product;
pub mod rating;
