//! Product ratings and reviews.

mod service;

pub use service::{ProductRatingsView, RatingService};
