//! User entity and role enum.

mod model;
mod role;

pub use model::{UpsertUser, User};
pub use role::Role;
