//! Order placement, checkout, and lifecycle.
//!
//! Checkout is two client round trips: open a payment intent for the
//! cart total, complete the payment browser-side, then call checkout
//! with the intent id. The order itself is created in one transaction
//! that decrements stock per line under a guard, snapshots names and
//! prices, and clears the cart. Admin notifications go out after the
//! commit and never fail the request.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use urpearl_core::types::money::to_minor_units;
use urpearl_core::types::{PageRequest, PageResponse};
use urpearl_core::{AppError, AppResult};
use urpearl_database::repositories::{
    CartRepository, InventoryRepository, OrderFilter, OrderLineInsert, OrderRepository,
    ProductRepository,
};
use urpearl_entity::{
    CartLine, Inventory, NewOrderItem, Order, OrderItem, OrderStats, OrderStatus, ShippingAddress,
};
use urpearl_payment::{CreateIntent, PaymentProvider};

use crate::cart::collect_stock_problems;
use crate::context::RequestContext;
use crate::notification::NotificationService;

/// An order with its line items, shaped the way clients consume it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// What the client needs to complete a payment browser-side.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutIntentView {
    pub payment_intent_id: String,
    pub client_secret: String,
    /// Cart total in major units at the time the intent was opened.
    pub amount: Decimal,
    pub currency: String,
}

/// Orders and the checkout flow around them.
#[derive(Debug, Clone)]
pub struct OrderService {
    pool: PgPool,
    order_repo: Arc<OrderRepository>,
    cart_repo: Arc<CartRepository>,
    inventory_repo: Arc<InventoryRepository>,
    product_repo: Arc<ProductRepository>,
    notifications: Arc<NotificationService>,
    payments: Arc<dyn PaymentProvider>,
    currency: String,
}

impl OrderService {
    /// Create a new order service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        order_repo: Arc<OrderRepository>,
        cart_repo: Arc<CartRepository>,
        inventory_repo: Arc<InventoryRepository>,
        product_repo: Arc<ProductRepository>,
        notifications: Arc<NotificationService>,
        payments: Arc<dyn PaymentProvider>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            order_repo,
            cart_repo,
            inventory_repo,
            product_repo,
            notifications,
            payments,
            currency: currency.into(),
        }
    }

    /// Open a payment intent covering the caller's current cart total.
    ///
    /// The cart must be non-empty and every line fulfillable, so a
    /// stale cart is caught before any money is involved.
    pub async fn create_checkout_intent(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<CheckoutIntentView> {
        let lines = self.cart_repo.find_lines(ctx.user_id).await?;
        if lines.is_empty() {
            return Err(AppError::empty_cart("Cannot check out an empty cart"));
        }
        let problems = collect_stock_problems(&lines);
        if !problems.is_empty() {
            return Err(AppError::insufficient_stock(
                "Some items in your cart exceed available stock",
            )
            .with_details(json!({ "problems": problems })));
        }

        let total: Decimal = lines.iter().map(CartLine::line_total).sum();
        let amount_minor = to_minor_units(total)?;

        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), ctx.user_id.to_string());

        let intent = self
            .payments
            .create_intent(&CreateIntent {
                amount_minor,
                currency: self.currency.clone(),
                metadata,
            })
            .await?;
        let client_secret = intent
            .client_secret
            .clone()
            .ok_or_else(|| AppError::external_service("Provider returned no client secret"))?;

        info!(
            user_id = %ctx.user_id,
            intent_id = %intent.id,
            amount_minor,
            "Checkout intent opened"
        );

        Ok(CheckoutIntentView {
            payment_intent_id: intent.id,
            client_secret,
            amount: total,
            currency: self.currency.clone(),
        })
    }

    /// Complete checkout against a previously opened payment intent.
    ///
    /// The client-supplied intent id is re-validated against the
    /// provider: retrieve, then at most one explicit confirm. Anything
    /// short of succeeded or processing after that fails the checkout
    /// with no order created.
    pub async fn checkout(
        &self,
        ctx: &RequestContext,
        payment_intent_id: &str,
        shipping_address: &ShippingAddress,
    ) -> AppResult<OrderView> {
        if payment_intent_id.trim().is_empty() {
            return Err(AppError::validation("payment_intent_id must not be blank"));
        }
        let lines = self.cart_repo.find_lines(ctx.user_id).await?;
        if lines.is_empty() {
            return Err(AppError::empty_cart("Cannot check out an empty cart"));
        }

        let mut intent = self.payments.retrieve_intent(payment_intent_id).await?;
        if !(intent.status.is_succeeded() || intent.status.is_processing()) {
            intent = self.payments.confirm_intent(payment_intent_id).await?;
        }
        if !(intent.status.is_succeeded() || intent.status.is_processing()) {
            return Err(AppError::payment(format!(
                "Payment not completed (status: {})",
                intent.status
            )));
        }

        // The order is placed at current cart prices even if they have
        // drifted since the intent was opened; the mismatch is logged
        // with both amounts so it can be reconciled.
        let total: Decimal = lines.iter().map(CartLine::line_total).sum();
        let cart_minor = to_minor_units(total)?;
        if intent.amount_minor != cart_minor {
            warn!(
                intent_id = %intent.id,
                intent_amount_minor = intent.amount_minor,
                cart_amount_minor = cart_minor,
                "Payment intent amount does not match current cart total"
            );
        }

        self.create_order_from_cart(ctx, shipping_address, Some(&intent.id))
            .await
    }

    /// Turn the caller's cart into an order in one transaction.
    ///
    /// Each line decrements stock under a guard; a line that no longer
    /// has enough units rolls the whole order back. Product names and
    /// prices are snapshotted onto the order lines, the cart is
    /// cleared, and the order starts paid exactly when a payment
    /// reference is attached.
    pub async fn create_order_from_cart(
        &self,
        ctx: &RequestContext,
        shipping_address: &ShippingAddress,
        payment_intent_id: Option<&str>,
    ) -> AppResult<OrderView> {
        let mut tx = crate::tx::begin(&self.pool).await?;

        let lines = self.cart_repo.find_lines_in_tx(&mut tx, ctx.user_id).await?;
        if lines.is_empty() {
            return Err(AppError::empty_cart(
                "Cannot place an order from an empty cart",
            ));
        }

        let mut inserts = Vec::with_capacity(lines.len());
        let mut touched = Vec::with_capacity(lines.len());
        for line in &lines {
            match self
                .inventory_repo
                .try_decrement_in_tx(&mut tx, line.product_id, line.quantity)
                .await?
            {
                Some(inventory) => touched.push((line.product_name.clone(), inventory)),
                None => {
                    return Err(self
                        .insufficient_stock_error(
                            &mut tx,
                            line.product_id,
                            &line.product_name,
                            line.quantity,
                        )
                        .await);
                }
            }
            inserts.push(OrderLineInsert {
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }

        let total: Decimal = lines.iter().map(CartLine::line_total).sum();
        let status = if payment_intent_id.is_some() {
            OrderStatus::Paid
        } else {
            OrderStatus::Pending
        };

        let (order, items) = self
            .order_repo
            .create_in_tx(
                &mut tx,
                ctx.user_id,
                total,
                status,
                payment_intent_id,
                shipping_address,
                &inserts,
            )
            .await?;
        self.cart_repo.clear_in_tx(&mut tx, ctx.user_id).await?;
        crate::tx::commit(tx).await?;

        info!(
            order_id = %order.id,
            user_id = %ctx.user_id,
            total = %order.total_amount,
            status = %order.status,
            "Order placed from cart"
        );
        self.after_order_placed(&order, &items, &ctx.name, &touched)
            .await;

        Ok(OrderView { order, items })
    }

    /// Create an order from an explicit item list, for back-office
    /// use. Stock moves exactly as in the cart path; the order lands
    /// on `target_user_id` when given, otherwise on the caller.
    pub async fn create_order(
        &self,
        ctx: &RequestContext,
        target_user_id: Option<Uuid>,
        order_items: &[NewOrderItem],
        shipping_address: &ShippingAddress,
    ) -> AppResult<OrderView> {
        ctx.require_admin()?;
        if order_items.is_empty() {
            return Err(AppError::validation("Order needs at least one item"));
        }
        if order_items.iter().any(|i| i.quantity <= 0) {
            return Err(AppError::validation("Item quantities must be positive"));
        }
        let user_id = target_user_id.unwrap_or(ctx.user_id);

        let mut tx = crate::tx::begin(&self.pool).await?;

        let mut inserts = Vec::with_capacity(order_items.len());
        let mut touched = Vec::with_capacity(order_items.len());
        let mut total = Decimal::ZERO;
        for item in order_items {
            let product = self
                .product_repo
                .find_by_id_in_tx(&mut tx, item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", item.product_id))
                })?;
            match self
                .inventory_repo
                .try_decrement_in_tx(&mut tx, product.id, item.quantity)
                .await?
            {
                Some(inventory) => touched.push((product.name.clone(), inventory)),
                None => {
                    return Err(self
                        .insufficient_stock_error(
                            &mut tx,
                            product.id,
                            &product.name,
                            item.quantity,
                        )
                        .await);
                }
            }
            total += product.price * Decimal::from(item.quantity);
            inserts.push(OrderLineInsert {
                product_id: product.id,
                product_name: product.name,
                quantity: item.quantity,
                unit_price: product.price,
            });
        }

        let (order, items) = self
            .order_repo
            .create_in_tx(
                &mut tx,
                user_id,
                total,
                OrderStatus::Pending,
                None,
                shipping_address,
                &inserts,
            )
            .await?;
        crate::tx::commit(tx).await?;

        info!(
            order_id = %order.id,
            user_id = %user_id,
            placed_by = %ctx.user_id,
            total = %order.total_amount,
            "Order created"
        );
        self.after_order_placed(&order, &items, &ctx.name, &touched)
            .await;

        Ok(OrderView { order, items })
    }

    /// Fetch one order with its lines. Buyers see only their own
    /// orders; admins see any.
    pub async fn get_order(&self, ctx: &RequestContext, order_id: Uuid) -> AppResult<OrderView> {
        let order = self.require_order(order_id).await?;
        if order.user_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::forbidden("You do not have access to this order"));
        }
        let items = self.order_repo.find_items(order_id).await?;
        Ok(OrderView { order, items })
    }

    /// List the caller's own orders, newest first.
    pub async fn list_orders(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Order>> {
        self.order_repo.find_by_user(ctx.user_id, page).await
    }

    /// List every order, optionally narrowed by status.
    pub async fn list_all_orders(
        &self,
        ctx: &RequestContext,
        status: Option<OrderStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Order>> {
        ctx.require_admin()?;
        let filter = OrderFilter {
            status,
            user_id: None,
        };
        self.order_repo.find_all(&filter, page).await
    }

    /// Move an order to a new status. Cancellation is delegated to
    /// [`Self::cancel_order`] so the inventory restore cannot be
    /// bypassed; any other target is written as-is.
    pub async fn update_order_status(
        &self,
        ctx: &RequestContext,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> AppResult<OrderView> {
        ctx.require_admin()?;
        if new_status == OrderStatus::Cancelled {
            return self.cancel_order(ctx, order_id).await;
        }

        let order = self.require_order(order_id).await?;
        let items = self.order_repo.find_items(order_id).await?;
        if order.status == new_status {
            return Ok(OrderView { order, items });
        }

        let old_status = order.status;
        let updated = self.order_repo.update_status(order_id, new_status).await?;
        info!(
            order_id = %order_id,
            from = %old_status,
            to = %new_status,
            "Order status updated"
        );

        if let Err(e) = self
            .notifications
            .notify_admins_order_status_changed(&updated, old_status, new_status)
            .await
        {
            warn!(order_id = %order_id, error = %e, "Status-change alert failed");
        }

        Ok(OrderView {
            order: updated,
            items,
        })
    }

    /// Cancel an order and put its units back on the shelf.
    ///
    /// The status guard and the write are one statement, so a cancel
    /// racing another cancel (or a shipment) cannot both pass; the
    /// loser gets a conflict.
    pub async fn cancel_order(&self, ctx: &RequestContext, order_id: Uuid) -> AppResult<OrderView> {
        let order = self.require_order(order_id).await?;
        if order.user_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::forbidden("You do not have access to this order"));
        }
        if !order.status.can_cancel() {
            return Err(AppError::conflict(format!(
                "Order in status {} can no longer be cancelled",
                order.status
            )));
        }
        let old_status = order.status;

        let mut tx = crate::tx::begin(&self.pool).await?;
        let cancelled = self
            .order_repo
            .try_cancel_in_tx(&mut tx, order_id)
            .await?
            .ok_or_else(|| AppError::conflict("Order can no longer be cancelled"))?;
        let items = self.order_repo.find_items_in_tx(&mut tx, order_id).await?;

        let mut restocked = Vec::with_capacity(items.len());
        for item in &items {
            let inventory = self
                .inventory_repo
                .increment_in_tx(&mut tx, item.product_id, item.quantity)
                .await?;
            restocked.push((item.product_name.clone(), inventory));
        }
        crate::tx::commit(tx).await?;

        info!(order_id = %order_id, user_id = %ctx.user_id, "Order cancelled");

        // A restock can lift a product back over its threshold, which
        // clears any unread low-stock alerts for it.
        for (name, inventory) in &restocked {
            if let Err(e) = self
                .notifications
                .sync_low_stock_state(
                    inventory.product_id,
                    name,
                    inventory.quantity,
                    inventory.low_stock_threshold,
                )
                .await
            {
                warn!(
                    product_id = %inventory.product_id,
                    error = %e,
                    "Low stock sync failed after cancel"
                );
            }
        }
        if let Err(e) = self
            .notifications
            .notify_admins_order_status_changed(&cancelled, old_status, OrderStatus::Cancelled)
            .await
        {
            warn!(order_id = %order_id, error = %e, "Status-change alert failed");
        }

        Ok(OrderView {
            order: cancelled,
            items,
        })
    }

    /// Back-office order counters.
    pub async fn get_order_stats(&self, ctx: &RequestContext) -> AppResult<OrderStats> {
        ctx.require_admin()?;
        self.order_repo.stats().await
    }

    async fn require_order(&self, order_id: Uuid) -> AppResult<Order> {
        self.order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    /// Build the insufficient-stock error for a failed guarded
    /// decrement, reloading the row so the message carries the real
    /// remaining count.
    async fn insufficient_stock_error(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
        product_name: &str,
        requested: i32,
    ) -> AppError {
        let available = match self
            .inventory_repo
            .find_by_product_in_tx(conn, product_id)
            .await
        {
            Ok(row) => row.map(|i| i.quantity).unwrap_or(0),
            Err(e) => return e,
        };
        AppError::insufficient_stock(format!(
            "Only {available} left for '{product_name}' (requested {requested})"
        ))
    }

    /// Post-commit fan-out: low-stock state for every touched product
    /// and an order notice to the admins. Failures are logged, never
    /// bubbled, since the order is already committed.
    async fn after_order_placed(
        &self,
        order: &Order,
        items: &[OrderItem],
        buyer_name: &str,
        touched: &[(String, Inventory)],
    ) {
        for (name, inventory) in touched {
            if let Err(e) = self
                .notifications
                .sync_low_stock_state(
                    inventory.product_id,
                    name,
                    inventory.quantity,
                    inventory.low_stock_threshold,
                )
                .await
            {
                warn!(
                    product_id = %inventory.product_id,
                    error = %e,
                    "Low stock sync failed after order"
                );
            }
        }
        if let Err(e) = self
            .notifications
            .notify_admins_order_created(order, items.len(), buyer_name)
            .await
        {
            warn!(order_id = %order.id, error = %e, "Order-created alert failed");
        }
    }
}
