//! Inventory repository implementation.
//!
//! Stock movements are single guarded UPDATE statements so the
//! no-negative invariant holds under concurrent checkouts without
//! explicit row locks.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::{AppError, ErrorKind};
use urpearl_entity::{Inventory, InventoryStats};

/// Admin dashboard read model: a low inventory row with its product.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct LowStockRow {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub low_stock_threshold: i32,
}

/// Repository for inventory reads and guarded stock movements.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Create a new inventory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the inventory row for a product.
    pub async fn find_by_product(&self, product_id: Uuid) -> AppResult<Option<Inventory>> {
        sqlx::query_as::<_, Inventory>("SELECT * FROM inventories WHERE product_id = $1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find inventory", e))
    }

    /// Find the inventory row for a product inside an open transaction.
    pub async fn find_by_product_in_tx(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
    ) -> AppResult<Option<Inventory>> {
        sqlx::query_as::<_, Inventory>("SELECT * FROM inventories WHERE product_id = $1")
            .bind(product_id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find inventory", e))
    }

    /// Insert an inventory row as part of an open transaction.
    pub async fn create_in_tx(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
        quantity: i32,
        low_stock_threshold: i32,
    ) -> AppResult<Inventory> {
        sqlx::query_as::<_, Inventory>(
            "INSERT INTO inventories (product_id, quantity, low_stock_threshold) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(product_id)
        .bind(quantity)
        .bind(low_stock_threshold)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create inventory", e))
    }

    /// Set absolute stock levels for a product, creating the row if it
    /// does not exist. `None` keeps the stored value.
    pub async fn set_levels(
        &self,
        product_id: Uuid,
        quantity: Option<i32>,
        low_stock_threshold: Option<i32>,
    ) -> AppResult<Inventory> {
        sqlx::query_as::<_, Inventory>(
            "INSERT INTO inventories (product_id, quantity, low_stock_threshold) \
             VALUES ($1, COALESCE($2, 0), COALESCE($3, 5)) \
             ON CONFLICT (product_id) DO UPDATE \
               SET quantity = COALESCE($2, inventories.quantity), \
                   low_stock_threshold = COALESCE($3, inventories.low_stock_threshold), \
                   updated_at = NOW() \
             RETURNING *",
        )
        .bind(product_id)
        .bind(quantity)
        .bind(low_stock_threshold)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set stock levels", e))
    }

    /// Attempt to take `amount` units from a product's stock.
    ///
    /// The condition and the write are one statement, so two competing
    /// buyers can never both succeed on the last unit. Returns `None`
    /// when the row is missing or holds fewer than `amount` units.
    pub async fn try_decrement(
        &self,
        product_id: Uuid,
        amount: i32,
    ) -> AppResult<Option<Inventory>> {
        sqlx::query_as::<_, Inventory>(
            "UPDATE inventories \
             SET quantity = quantity - $2, updated_at = NOW() \
             WHERE product_id = $1 AND quantity >= $2 \
             RETURNING *",
        )
        .bind(product_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to decrement stock", e))
    }

    /// Guarded decrement inside an open transaction. See
    /// [`Self::try_decrement`].
    pub async fn try_decrement_in_tx(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
        amount: i32,
    ) -> AppResult<Option<Inventory>> {
        sqlx::query_as::<_, Inventory>(
            "UPDATE inventories \
             SET quantity = quantity - $2, updated_at = NOW() \
             WHERE product_id = $1 AND quantity >= $2 \
             RETURNING *",
        )
        .bind(product_id)
        .bind(amount)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to decrement stock", e))
    }

    /// Return `amount` units to a product's stock.
    pub async fn increment(&self, product_id: Uuid, amount: i32) -> AppResult<Inventory> {
        sqlx::query_as::<_, Inventory>(
            "UPDATE inventories \
             SET quantity = quantity + $2, updated_at = NOW() \
             WHERE product_id = $1 \
             RETURNING *",
        )
        .bind(product_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to increment stock", e))?
        .ok_or_else(|| AppError::not_found(format!("No inventory for product {product_id}")))
    }

    /// Return `amount` units inside an open transaction.
    pub async fn increment_in_tx(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
        amount: i32,
    ) -> AppResult<Inventory> {
        sqlx::query_as::<_, Inventory>(
            "UPDATE inventories \
             SET quantity = quantity + $2, updated_at = NOW() \
             WHERE product_id = $1 \
             RETURNING *",
        )
        .bind(product_id)
        .bind(amount)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to increment stock", e))?
        .ok_or_else(|| AppError::not_found(format!("No inventory for product {product_id}")))
    }

    /// Stock band counters over every catalog product.
    pub async fn stats(&self) -> AppResult<InventoryStats> {
        sqlx::query_as::<_, InventoryStats>(
            "SELECT COUNT(*) AS total_products, \
                    COUNT(*) FILTER (WHERE i.quantity > i.low_stock_threshold) AS in_stock, \
                    COUNT(*) FILTER (WHERE i.quantity > 0 \
                                       AND i.quantity <= i.low_stock_threshold) AS low_stock, \
                    COUNT(*) FILTER (WHERE i.quantity IS NULL OR i.quantity = 0) \
                      AS out_of_stock \
             FROM products p \
             LEFT JOIN inventories i ON i.product_id = p.id",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load inventory stats", e)
        })
    }

    /// List all products at or below their low-stock threshold, lowest
    /// first.
    pub async fn find_low_stock(&self) -> AppResult<Vec<LowStockRow>> {
        sqlx::query_as::<_, LowStockRow>(
            "SELECT i.product_id, p.name AS product_name, p.sku, \
                    i.quantity, i.low_stock_threshold \
             FROM inventories i \
             JOIN products p ON p.id = i.product_id \
             WHERE i.quantity <= i.low_stock_threshold \
             ORDER BY i.quantity ASC, p.name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list low stock rows", e)
        })
    }
}
