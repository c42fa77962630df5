//! Rating and review models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest accepted star score.
pub const RATING_MIN: i32 = 1;
/// Highest accepted star score.
pub const RATING_MAX: i32 = 5;
/// Review body length cap, in characters.
pub const MAX_REVIEW_CHARS: usize = 1000;

/// A buyer's score and optional review for a product.
///
/// One row per `(user_id, product_id)` pair, enforced by a unique
/// constraint; re-rating updates the row in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// Star score, within [`RATING_MIN`]..=[`RATING_MAX`].
    pub rating: i32,
    pub review: Option<String>,
    /// Set when the rater had a paid or shipped order containing the
    /// product at submission time.
    pub is_verified_purchase: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rating read model joined with the author's display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RatingWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub review: Option<String>,
    pub is_verified_purchase: bool,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate over all ratings of one product.
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
pub struct RatingSummary {
    /// Mean score, 0.0 when the product has no ratings.
    pub average: f64,
    pub count: i64,
}

/// Whether `score` is inside the accepted star range.
pub fn is_valid_score(score: i32) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&score)
}
