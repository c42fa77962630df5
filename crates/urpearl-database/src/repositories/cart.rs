//! Cart repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::{AppError, ErrorKind};
use urpearl_entity::cart::{CartItem, CartLine};

/// SELECT for cart lines joined with live product and stock data.
const LINE_SELECT: &str = "SELECT ci.id, ci.product_id, p.name AS product_name, \
       p.slug AS product_slug, p.image_url, p.price AS unit_price, \
       ci.quantity, COALESCE(i.quantity, 0) AS in_stock, \
       ci.created_at, ci.updated_at \
     FROM cart_items ci \
     JOIN products p ON p.id = ci.product_id \
     LEFT JOIN inventories i ON i.product_id = ci.product_id \
     WHERE ci.user_id = $1 \
     ORDER BY ci.created_at ASC";

/// Repository for per-user cart rows.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Create a new cart repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load a user's cart lines, oldest first.
    pub async fn find_lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        sqlx::query_as::<_, CartLine>(LINE_SELECT)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load cart", e))
    }

    /// Load a user's cart lines inside an open transaction.
    pub async fn find_lines_in_tx(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> AppResult<Vec<CartLine>> {
        sqlx::query_as::<_, CartLine>(LINE_SELECT)
            .bind(user_id)
            .fetch_all(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load cart", e))
    }

    /// Find one cart row by owner and product.
    pub async fn find_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CartItem>> {
        sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find cart item", e))
    }

    /// Add a product to a cart, merging quantities when the product is
    /// already present.
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartItem> {
        sqlx::query_as::<_, CartItem>(
            "INSERT INTO cart_items (user_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, product_id) DO UPDATE \
               SET quantity = cart_items.quantity + EXCLUDED.quantity, \
                   updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add cart item", e))
    }

    /// Overwrite the quantity of one cart row owned by `user_id`.
    pub async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartItem> {
        sqlx::query_as::<_, CartItem>(
            "UPDATE cart_items SET quantity = $3, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING *",
        )
        .bind(item_id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update cart item", e))?
        .ok_or_else(|| AppError::not_found(format!("Cart item {item_id} not found")))
    }

    /// Remove one cart row owned by `user_id`.
    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove cart item", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Cart item {item_id} not found")));
        }
        Ok(())
    }

    /// Remove every cart row for a user.
    pub async fn clear(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear cart", e))?;
        Ok(result.rows_affected())
    }

    /// Remove every cart row for a user inside an open transaction.
    pub async fn clear_in_tx(&self, conn: &mut PgConnection, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear cart", e))?;
        Ok(result.rows_affected())
    }

    /// Find one cart row by id, scoped to its owner.
    pub async fn find_item_by_id(
        &self,
        user_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<Option<CartItem>> {
        sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE id = $1 AND user_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find cart item", e))
    }

    /// Total units across a user's cart lines.
    pub async fn sum_quantities(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::bigint FROM cart_items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count cart items", e))
    }
}
