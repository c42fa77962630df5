//! Shared types used across crates.

pub mod money;
pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
