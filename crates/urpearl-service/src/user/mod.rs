//! User sign-in and profile services.

mod service;

pub use service::UserService;
