//! Rating service: verified-purchase reviews with one review per
//! buyer per product.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use urpearl_core::types::{PageRequest, PageResponse};
use urpearl_core::{AppError, AppResult};
use urpearl_database::repositories::{OrderRepository, ProductRepository, RatingRepository};
use urpearl_entity::rating::{MAX_REVIEW_CHARS, RATING_MAX, RATING_MIN, is_valid_score};
use urpearl_entity::{Rating, RatingWithAuthor};

use crate::context::RequestContext;

/// A product's ratings page together with its aggregate summary.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRatingsView {
    pub average: f64,
    pub count: i64,
    pub ratings: PageResponse<RatingWithAuthor>,
}

/// Reviews and their eligibility rules.
#[derive(Debug, Clone)]
pub struct RatingService {
    rating_repo: Arc<RatingRepository>,
    product_repo: Arc<ProductRepository>,
    order_repo: Arc<OrderRepository>,
}

impl RatingService {
    /// Create a new rating service.
    pub fn new(
        rating_repo: Arc<RatingRepository>,
        product_repo: Arc<ProductRepository>,
        order_repo: Arc<OrderRepository>,
    ) -> Self {
        Self {
            rating_repo,
            product_repo,
            order_repo,
        }
    }

    /// Submit a first review of a product.
    ///
    /// Only buyers with a paid or shipped order containing the product
    /// may review it, and only once. The pre-check gives a friendly
    /// conflict; the unique index closes the race for two concurrent
    /// submissions.
    pub async fn create_rating(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        rating: i32,
        review: Option<&str>,
    ) -> AppResult<Rating> {
        validate_score(rating)?;
        validate_review(review)?;

        self.product_repo
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {product_id} not found")))?;

        if !self
            .order_repo
            .has_purchased(ctx.user_id, product_id)
            .await?
        {
            return Err(AppError::forbidden(
                "Only verified purchasers can review this product",
            ));
        }
        if self
            .rating_repo
            .find_by_user_and_product(ctx.user_id, product_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("You have already reviewed this product"));
        }

        let created = self
            .rating_repo
            .insert(ctx.user_id, product_id, rating, review, true)
            .await?;

        info!(
            user_id = %ctx.user_id,
            product_id = %product_id,
            rating,
            "Rating created"
        );
        Ok(created)
    }

    /// Patch the caller's own review. Admins cannot edit reviews they
    /// do not own; moderation is deletion.
    pub async fn update_rating(
        &self,
        ctx: &RequestContext,
        rating_id: Uuid,
        rating: Option<i32>,
        review: Option<&str>,
    ) -> AppResult<Rating> {
        if let Some(score) = rating {
            validate_score(score)?;
        }
        validate_review(review)?;

        let existing = self.require_rating(rating_id).await?;
        if existing.user_id != ctx.user_id {
            return Err(AppError::forbidden("You can only edit your own review"));
        }

        self.rating_repo
            .update_own(ctx.user_id, rating_id, rating, review)
            .await
    }

    /// Delete a review: the owner retracting it, or an admin
    /// moderating it away.
    pub async fn delete_rating(&self, ctx: &RequestContext, rating_id: Uuid) -> AppResult<()> {
        let existing = self.require_rating(rating_id).await?;
        if existing.user_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::forbidden("You can only delete your own review"));
        }

        self.rating_repo.delete(rating_id).await?;
        info!(
            rating_id = %rating_id,
            deleted_by = %ctx.user_id,
            "Rating deleted"
        );
        Ok(())
    }

    /// A product's reviews with author names, newest first, plus the
    /// running average and count.
    pub async fn list_for_product(
        &self,
        product_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<ProductRatingsView> {
        let summary = self.rating_repo.summary(product_id).await?;
        let ratings = self.rating_repo.find_by_product(product_id, page).await?;
        Ok(ProductRatingsView {
            average: summary.average,
            count: summary.count,
            ratings,
        })
    }

    async fn require_rating(&self, rating_id: Uuid) -> AppResult<Rating> {
        self.rating_repo
            .find_by_id(rating_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Rating {rating_id} not found")))
    }
}

fn validate_score(rating: i32) -> AppResult<()> {
    if !is_valid_score(rating) {
        return Err(AppError::validation(format!(
            "Rating must be between {RATING_MIN} and {RATING_MAX}"
        )));
    }
    Ok(())
}

fn validate_review(review: Option<&str>) -> AppResult<()> {
    if let Some(text) = review {
        if text.chars().count() > MAX_REVIEW_CHARS {
            return Err(AppError::validation(format!(
                "Review must be at most {MAX_REVIEW_CHARS} characters"
            )));
        }
    }
    Ok(())
}
