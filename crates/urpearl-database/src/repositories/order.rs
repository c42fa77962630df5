//! Order repository implementation.
//!
//! Status flips that must not race (payment confirmation, cancellation)
//! are guarded UPDATE statements: the expected current status sits in
//! the WHERE clause, so a lost race surfaces as zero rows instead of a
//! double transition.

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::types::pagination::{PageRequest, PageResponse};
use urpearl_core::{AppError, ErrorKind};
use urpearl_entity::order::{Order, OrderItem, OrderStats, OrderStatus, ShippingAddress};

/// A fully priced line ready for insertion, with product fields
/// snapshotted by the service.
#[derive(Debug, Clone)]
pub struct OrderLineInsert {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Admin order listing filters.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Restrict to one buyer.
    pub user_id: Option<Uuid>,
}

/// Repository for orders and their lines.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its lines as part of an open transaction.
    pub async fn create_in_tx(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        total_amount: Decimal,
        status: OrderStatus,
        payment_intent_id: Option<&str>,
        shipping_address: &ShippingAddress,
        lines: &[OrderLineInsert],
    ) -> AppResult<(Order, Vec<OrderItem>)> {
        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders \
               (user_id, total_amount, status, payment_intent_id, shipping_address) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(total_amount)
        .bind(status)
        .bind(payment_intent_id)
        .bind(Json(shipping_address))
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create order", e))?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO order_items \
                   (order_id, product_id, product_name, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING *",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create order item", e)
            })?;
            items.push(item);
        }

        Ok((order, items))
    }

    /// Find an order by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find order", e))
    }

    /// Load the lines of an order, insertion order preserved.
    pub async fn find_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load order items", e))
    }

    /// Load the lines of an order inside an open transaction.
    pub async fn find_items_in_tx(
        &self,
        conn: &mut PgConnection,
        order_id: Uuid,
    ) -> AppResult<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(order_id)
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load order items", e))
    }

    /// List a user's orders, newest first.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Order>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count orders", e))?;

        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list orders", e))?;

        Ok(PageResponse::new(
            orders,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all orders with optional filters, newest first.
    pub async fn find_all(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Order>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders \
             WHERE ($1::order_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR user_id = $2)",
        )
        .bind(filter.status)
        .bind(filter.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count orders", e))?;

        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders \
             WHERE ($1::order_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR user_id = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(filter.status)
        .bind(filter.user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list orders", e))?;

        Ok(PageResponse::new(
            orders,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Attach a payment intent to an order.
    pub async fn set_payment_intent(&self, order_id: Uuid, intent_id: &str) -> AppResult<Order> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET payment_intent_id = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(order_id)
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to attach payment intent", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    /// Overwrite an order's status without a guard. Cancellation never
    /// goes through here; it uses [`Self::try_cancel_in_tx`] so the
    /// inventory restore cannot be skipped.
    pub async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(order_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update order status", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    /// Flip an order from `from` to `to` if and only if it still holds
    /// `from`. Returns `None` when the order is missing or has moved on.
    pub async fn try_transition_in_tx(
        &self,
        conn: &mut PgConnection,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING *",
        )
        .bind(order_id)
        .bind(from)
        .bind(to)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to transition order status", e)
        })
    }

    /// Flip an order to cancelled if it is still pending or paid.
    /// Returns `None` when the order is missing or no longer
    /// cancellable; the guard and the write are one statement.
    pub async fn try_cancel_in_tx(
        &self,
        conn: &mut PgConnection,
        order_id: Uuid,
    ) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = 'cancelled', updated_at = NOW() \
             WHERE id = $1 AND status IN ('pending', 'paid') \
             RETURNING *",
        )
        .bind(order_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel order", e))
    }

    /// Whether the user has a paid or shipped order containing the
    /// product. Backs the verified-purchase badge on ratings.
    pub async fn has_purchased(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
               SELECT 1 FROM orders o \
               JOIN order_items oi ON oi.order_id = o.id \
               WHERE o.user_id = $1 AND oi.product_id = $2 \
                 AND o.status IN ('paid', 'shipped'))",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check purchase history", e)
        })
    }

    /// Back-office order counters in a single round trip.
    pub async fn stats(&self) -> AppResult<OrderStats> {
        sqlx::query_as::<_, OrderStats>(
            "SELECT COUNT(*) AS total_orders, \
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
                    COUNT(*) FILTER (WHERE status = 'paid') AS paid, \
                    COUNT(*) FILTER (WHERE status = 'shipped') AS shipped, \
                    COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled, \
                    COALESCE(SUM(total_amount) \
                             FILTER (WHERE status IN ('paid', 'shipped')), 0) AS total_revenue \
             FROM orders",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load order stats", e))
    }
}
