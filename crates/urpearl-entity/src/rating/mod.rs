//! Product rating entities.

mod model;

pub use model::{
    is_valid_score, Rating, RatingSummary, RatingWithAuthor, MAX_REVIEW_CHARS, RATING_MAX,
    RATING_MIN,
};
