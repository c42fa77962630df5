//! # urpearl-core
//!
//! Core crate for UrPearl SHOP. Contains configuration schemas, shared
//! types (pagination, money conversion), and the unified error system.
//!
//! This crate has **no** internal dependencies on other UrPearl crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
