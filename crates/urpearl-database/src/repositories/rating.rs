//! Rating repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::types::pagination::{PageRequest, PageResponse};
use urpearl_core::{AppError, ErrorKind};
use urpearl_entity::rating::{Rating, RatingSummary, RatingWithAuthor};

/// Repository for product ratings.
#[derive(Debug, Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Create a new rating repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user's first rating of a product.
    ///
    /// The unique index on `(user_id, product_id)` backs the
    /// one-review-per-buyer rule; two concurrent first-time
    /// submissions cannot both land, the loser gets a conflict.
    pub async fn insert(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        rating: i32,
        review: Option<&str>,
        is_verified_purchase: bool,
    ) -> AppResult<Rating> {
        sqlx::query_as::<_, Rating>(
            "INSERT INTO ratings (user_id, product_id, rating, review, is_verified_purchase) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(rating)
        .bind(review)
        .bind(is_verified_purchase)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("ratings_user_id_product_id_key") =>
            {
                AppError::conflict("You have already reviewed this product")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create rating", e),
        })
    }

    /// Patch a rating owned by `user_id`. `None` keeps the stored
    /// value.
    pub async fn update_own(
        &self,
        user_id: Uuid,
        rating_id: Uuid,
        rating: Option<i32>,
        review: Option<&str>,
    ) -> AppResult<Rating> {
        sqlx::query_as::<_, Rating>(
            "UPDATE ratings \
             SET rating = COALESCE($3, rating), \
                 review = COALESCE($4, review), \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING *",
        )
        .bind(rating_id)
        .bind(user_id)
        .bind(rating)
        .bind(review)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update rating", e))?
        .ok_or_else(|| AppError::not_found(format!("Rating {rating_id} not found")))
    }

    /// Find a rating by primary key.
    pub async fn find_by_id(&self, rating_id: Uuid) -> AppResult<Option<Rating>> {
        sqlx::query_as::<_, Rating>("SELECT * FROM ratings WHERE id = $1")
            .bind(rating_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find rating", e))
    }

    /// Find a user's rating of one product.
    pub async fn find_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<Rating>> {
        sqlx::query_as::<_, Rating>(
            "SELECT * FROM ratings WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find rating", e))
    }

    /// List a product's ratings with author fields, newest first.
    pub async fn find_by_product(
        &self,
        product_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RatingWithAuthor>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count ratings", e))?;

        let ratings = sqlx::query_as::<_, RatingWithAuthor>(
            "SELECT r.id, r.user_id, r.product_id, r.rating, r.review, \
                    r.is_verified_purchase, u.name AS author_name, \
                    u.avatar_url AS author_avatar_url, r.created_at, r.updated_at \
             FROM ratings r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.product_id = $1 \
             ORDER BY r.created_at DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(product_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list ratings", e))?;

        Ok(PageResponse::new(
            ratings,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Average and count over one product's ratings. The average is
    /// computed in SQL so it is exact over whatever rows exist at read
    /// time.
    pub async fn summary(&self, product_id: Uuid) -> AppResult<RatingSummary> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT COALESCE(AVG(rating), 0)::float8 AS average, COUNT(*) AS count \
             FROM ratings WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load rating summary", e)
        })
    }

    /// Delete a rating. Ownership is the caller's problem; the service
    /// layer checks it before reaching here so admins can moderate.
    pub async fn delete(&self, rating_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(rating_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete rating", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Rating {rating_id} not found")));
        }
        Ok(())
    }
}
