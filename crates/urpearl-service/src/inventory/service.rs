//! Inventory service: admin stock adjustments with low-stock alerting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::types::pagination::{PageRequest, PageResponse};
use urpearl_core::AppError;
use urpearl_database::repositories::{
    InventoryRepository, LowStockRow, ProductFilter, ProductRepository,
};
use urpearl_entity::product::ProductSummary;
use urpearl_entity::{Inventory, InventoryStats};

use crate::context::RequestContext;
use crate::notification::NotificationService;

/// One entry of a bulk inventory update.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkInventoryUpdate {
    pub product_id: Uuid,
    /// Absolute quantity to set.
    pub quantity: i32,
}

/// Per-entry result of a bulk inventory update.
#[derive(Debug, Clone, Serialize)]
pub struct BulkInventoryOutcome {
    pub product_id: Uuid,
    pub success: bool,
    pub message: String,
}

/// Admin-facing stock management.
///
/// Every mutation re-evaluates the product's low-stock alert state, so
/// alerts appear when stock crosses down through the threshold and
/// disappear when a restock lifts it back out.
#[derive(Debug, Clone)]
pub struct InventoryService {
    inventory_repo: Arc<InventoryRepository>,
    product_repo: Arc<ProductRepository>,
    notifications: Arc<NotificationService>,
}

impl InventoryService {
    /// Creates a new inventory service.
    pub fn new(
        inventory_repo: Arc<InventoryRepository>,
        product_repo: Arc<ProductRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            inventory_repo,
            product_repo,
            notifications,
        }
    }

    /// List the whole catalog with stock counters, for the admin
    /// inventory screen.
    pub async fn list_inventory(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ProductSummary>> {
        ctx.require_admin()?;
        self.product_repo
            .search(&ProductFilter::default(), page)
            .await
    }

    /// Set a product's absolute stock quantity.
    pub async fn update_stock(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<Inventory> {
        ctx.require_admin()?;
        if quantity < 0 {
            return Err(AppError::validation("Quantity cannot be negative"));
        }

        let product = self.require_product(product_id).await?;
        let inventory = self
            .inventory_repo
            .set_levels(product_id, Some(quantity), None)
            .await?;

        info!(
            product_id = %product_id,
            quantity = inventory.quantity,
            admin = %ctx.user_id,
            "Stock updated"
        );
        self.check_low_stock_and_notify(&inventory, &product).await?;
        Ok(inventory)
    }

    /// Add `amount` units to a product's stock.
    pub async fn increment_stock(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        amount: i32,
    ) -> AppResult<Inventory> {
        ctx.require_admin()?;
        if amount < 0 {
            return Err(AppError::validation("Adjustment amount cannot be negative"));
        }

        let product = self.require_product(product_id).await?;
        let inventory = self.inventory_repo.increment(product_id, amount).await?;

        info!(
            product_id = %product_id,
            amount,
            quantity = inventory.quantity,
            admin = %ctx.user_id,
            "Stock incremented"
        );
        self.check_low_stock_and_notify(&inventory, &product).await?;
        Ok(inventory)
    }

    /// Take `amount` units from a product's stock. Fails without any
    /// mutation when fewer than `amount` units are on hand.
    pub async fn decrement_stock(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        amount: i32,
    ) -> AppResult<Inventory> {
        ctx.require_admin()?;
        if amount < 0 {
            return Err(AppError::validation("Adjustment amount cannot be negative"));
        }

        let product = self.require_product(product_id).await?;
        let inventory = self
            .inventory_repo
            .try_decrement(product_id, amount)
            .await?;

        let Some(inventory) = inventory else {
            let available = self
                .inventory_repo
                .find_by_product(product_id)
                .await?
                .map(|inv| inv.quantity)
                .unwrap_or(0);
            return Err(AppError::insufficient_stock(format!(
                "Only {available} left for '{}'",
                product
            )));
        };

        info!(
            product_id = %product_id,
            amount,
            quantity = inventory.quantity,
            admin = %ctx.user_id,
            "Stock decremented"
        );
        self.check_low_stock_and_notify(&inventory, &product).await?;
        Ok(inventory)
    }

    /// Set a product's low-stock alert threshold.
    pub async fn update_low_stock_threshold(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        threshold: i32,
    ) -> AppResult<Inventory> {
        ctx.require_admin()?;
        if threshold < 0 {
            return Err(AppError::validation("Threshold cannot be negative"));
        }

        let product = self.require_product(product_id).await?;
        let inventory = self
            .inventory_repo
            .set_levels(product_id, None, Some(threshold))
            .await?;

        info!(
            product_id = %product_id,
            threshold = inventory.low_stock_threshold,
            admin = %ctx.user_id,
            "Low stock threshold updated"
        );
        self.check_low_stock_and_notify(&inventory, &product).await?;
        Ok(inventory)
    }

    /// Apply absolute quantities to many products. Entries fail and
    /// succeed independently; the batch never aborts.
    pub async fn bulk_update_inventory(
        &self,
        ctx: &RequestContext,
        updates: &[BulkInventoryUpdate],
    ) -> AppResult<Vec<BulkInventoryOutcome>> {
        ctx.require_admin()?;

        let mut outcomes = Vec::with_capacity(updates.len());
        for update in updates {
            let outcome = match self
                .apply_bulk_entry(ctx, update.product_id, update.quantity)
                .await
            {
                Ok(quantity) => BulkInventoryOutcome {
                    product_id: update.product_id,
                    success: true,
                    message: format!("Quantity set to {quantity}"),
                },
                Err(e) => BulkInventoryOutcome {
                    product_id: update.product_id,
                    success: false,
                    message: e.message.clone(),
                },
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn apply_bulk_entry(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<i32> {
        if quantity < 0 {
            return Err(AppError::validation("Quantity cannot be negative"));
        }
        let inventory = self.update_stock(ctx, product_id, quantity).await?;
        Ok(inventory.quantity)
    }

    /// Products currently at or below their threshold.
    pub async fn get_low_stock_products(&self, ctx: &RequestContext) -> AppResult<Vec<LowStockRow>> {
        ctx.require_admin()?;
        self.inventory_repo.find_low_stock().await
    }

    /// Stock band counters over the catalog.
    pub async fn get_inventory_stats(&self, ctx: &RequestContext) -> AppResult<InventoryStats> {
        ctx.require_admin()?;
        self.inventory_repo.stats().await
    }

    /// Re-evaluate a product's low-stock alert state after a stock
    /// movement.
    async fn check_low_stock_and_notify(
        &self,
        inventory: &Inventory,
        product_name: &str,
    ) -> AppResult<()> {
        self.notifications
            .sync_low_stock_state(
                inventory.product_id,
                product_name,
                inventory.quantity,
                inventory.low_stock_threshold,
            )
            .await
    }

    async fn require_product(&self, product_id: Uuid) -> AppResult<String> {
        self.product_repo
            .find_by_id(product_id)
            .await?
            .map(|p| p.name)
            .ok_or_else(|| AppError::not_found("Product not found"))
    }
}
