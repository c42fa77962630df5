//! Cart service: per-user cart mutations with stock-aware guards.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::AppError;
use urpearl_database::repositories::{CartRepository, InventoryRepository, ProductRepository};
use urpearl_entity::cart::{CartItem, CartLine};

use crate::context::RequestContext;

/// A cart with its derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    /// Σ quantity × live unit price, in major units.
    pub total: Decimal,
    /// Σ quantity over all lines.
    pub item_count: i64,
}

impl CartView {
    fn from_lines(lines: Vec<CartLine>) -> Self {
        let total = lines.iter().map(CartLine::line_total).sum();
        let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();
        Self {
            lines,
            total,
            item_count,
        }
    }
}

/// Cart reads and mutations for the acting user.
#[derive(Debug, Clone)]
pub struct CartService {
    cart_repo: Arc<CartRepository>,
    product_repo: Arc<ProductRepository>,
    inventory_repo: Arc<InventoryRepository>,
}

impl CartService {
    /// Creates a new cart service.
    pub fn new(
        cart_repo: Arc<CartRepository>,
        product_repo: Arc<ProductRepository>,
        inventory_repo: Arc<InventoryRepository>,
    ) -> Self {
        Self {
            cart_repo,
            product_repo,
            inventory_repo,
        }
    }

    /// Load the acting user's cart with totals.
    pub async fn get_cart(&self, ctx: &RequestContext) -> AppResult<CartView> {
        let lines = self.cart_repo.find_lines(ctx.user_id).await?;
        Ok(CartView::from_lines(lines))
    }

    /// Σ quantity × live price over the cart.
    pub async fn get_cart_total(&self, ctx: &RequestContext) -> AppResult<Decimal> {
        Ok(self.get_cart(ctx).await?.total)
    }

    /// Σ quantity over the cart, for the storefront badge.
    pub async fn get_cart_item_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.cart_repo.sum_quantities(ctx.user_id).await
    }

    /// Add `quantity` units of a product to the cart, merging into an
    /// existing line. The merged quantity is checked against live
    /// stock, so two adds of the same product need stock for their sum.
    pub async fn add_to_cart(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartItem> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {product_id} not found")))?;

        let available = self
            .inventory_repo
            .find_by_product(product_id)
            .await?
            .map(|inv| inv.quantity)
            .unwrap_or(0);
        let already_carted = self
            .cart_repo
            .find_item(ctx.user_id, product_id)
            .await?
            .map(|item| item.quantity)
            .unwrap_or(0);

        let requested_total = already_carted.saturating_add(quantity);
        if requested_total > available {
            return Err(AppError::insufficient_stock(format!(
                "Only {available} left for '{}'",
                product.name
            )));
        }

        let item = self
            .cart_repo
            .add_item(ctx.user_id, product_id, quantity)
            .await?;
        info!(
            user_id = %ctx.user_id,
            product_id = %product_id,
            quantity = item.quantity,
            "Cart item added"
        );
        Ok(item)
    }

    /// Overwrite a line's quantity. Zero or negative removes the line;
    /// the returned `None` signals removal.
    pub async fn update_quantity(
        &self,
        ctx: &RequestContext,
        cart_item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Option<CartItem>> {
        let item = self
            .cart_repo
            .find_item_by_id(ctx.user_id, cart_item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cart item {cart_item_id} not found")))?;

        if quantity <= 0 {
            self.cart_repo.remove_item(ctx.user_id, cart_item_id).await?;
            info!(user_id = %ctx.user_id, cart_item_id = %cart_item_id, "Cart item removed");
            return Ok(None);
        }

        let product = self
            .product_repo
            .find_by_id(item.product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product no longer exists"))?;
        let available = self
            .inventory_repo
            .find_by_product(item.product_id)
            .await?
            .map(|inv| inv.quantity)
            .unwrap_or(0);
        if quantity > available {
            return Err(AppError::insufficient_stock(format!(
                "Only {available} left for '{}'",
                product.name
            )));
        }

        let updated = self
            .cart_repo
            .set_quantity(ctx.user_id, cart_item_id, quantity)
            .await?;
        Ok(Some(updated))
    }

    /// Remove one line from the cart.
    pub async fn remove_from_cart(&self, ctx: &RequestContext, cart_item_id: Uuid) -> AppResult<()> {
        self.cart_repo.remove_item(ctx.user_id, cart_item_id).await?;
        info!(user_id = %ctx.user_id, cart_item_id = %cart_item_id, "Cart item removed");
        Ok(())
    }

    /// Empty the cart.
    pub async fn clear_cart(&self, ctx: &RequestContext) -> AppResult<u64> {
        let removed = self.cart_repo.clear(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, removed, "Cart cleared");
        Ok(removed)
    }

    /// Messages for every line whose quantity now exceeds live stock.
    /// An empty list means the cart is fulfillable as-is.
    pub async fn validate_cart_stock(&self, ctx: &RequestContext) -> AppResult<Vec<String>> {
        let lines = self.cart_repo.find_lines(ctx.user_id).await?;
        Ok(collect_stock_problems(&lines))
    }
}

/// Pure half of cart validation, shared with checkout.
pub(crate) fn collect_stock_problems(lines: &[CartLine]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !line.is_fulfillable())
        .map(|line| {
            format!(
                "Only {} left for '{}' (requested {})",
                line.in_stock, line.product_name, line.quantity
            )
        })
        .collect()
}
