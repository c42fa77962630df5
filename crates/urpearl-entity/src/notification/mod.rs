//! Notification entity and kinds.

mod kind;
mod model;

pub use kind::NotificationKind;
pub use model::Notification;
