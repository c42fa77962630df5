//! Admin notification services.

mod service;

pub use service::NotificationService;
