//! Notification service: admin alert fan-out and inbox management.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::types::pagination::{PageRequest, PageResponse};
use urpearl_database::repositories::{NotificationRepository, UserRepository};
use urpearl_entity::notification::{Notification, NotificationKind};
use urpearl_entity::order::{Order, OrderStatus};

use crate::context::RequestContext;

/// Manages the admin notification inbox and alert fan-out.
///
/// Alerts address every admin account individually; fan-out failures
/// for one recipient are logged and do not abort the rest, since the
/// triggering mutation has already committed.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notif_repo: Arc<NotificationRepository>,
    user_repo: Arc<UserRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notif_repo: Arc<NotificationRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self {
            notif_repo,
            user_repo,
        }
    }

    /// List the acting admin's notifications.
    pub async fn list_for_admin(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        ctx.require_admin()?;
        self.notif_repo
            .find_by_user(ctx.user_id, unread_only, page)
            .await
    }

    /// Unread count for the acting admin.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        ctx.require_admin()?;
        self.notif_repo.count_unread(ctx.user_id).await
    }

    /// Mark one of the acting admin's notifications as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> AppResult<Notification> {
        ctx.require_admin()?;
        self.notif_repo.mark_read(notification_id, ctx.user_id).await
    }

    /// Mark every notification of the acting admin as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        ctx.require_admin()?;
        self.notif_repo.mark_all_read(ctx.user_id).await
    }

    /// Bring low-stock alert state in line with the given counters:
    /// at or below the threshold ensures one unread alert per admin,
    /// above it clears any unread alerts for the product.
    pub async fn sync_low_stock_state(
        &self,
        product_id: Uuid,
        product_name: &str,
        quantity: i32,
        threshold: i32,
    ) -> AppResult<()> {
        if quantity <= threshold {
            self.notify_admins_low_stock(product_id, product_name, quantity, threshold)
                .await
        } else {
            self.clear_low_stock(product_id).await
        }
    }

    /// Alert every admin that a product has hit its threshold. An
    /// admin who already holds an unread alert for the product is
    /// skipped, so repeated drops do not pile up duplicates.
    pub async fn notify_admins_low_stock(
        &self,
        product_id: Uuid,
        product_name: &str,
        quantity: i32,
        threshold: i32,
    ) -> AppResult<()> {
        let title = "Low stock alert";
        let message = if quantity == 0 {
            format!("'{product_name}' is out of stock")
        } else {
            format!("'{product_name}' is down to {quantity} units (threshold {threshold})")
        };
        let payload = json!({
            "quantity": quantity,
            "low_stock_threshold": threshold,
        });

        for admin_id in self.user_repo.find_admin_ids().await? {
            let already_alerted = self
                .notif_repo
                .has_unread_low_stock_for(admin_id, product_id)
                .await?;
            if already_alerted {
                continue;
            }
            if let Err(e) = self
                .notif_repo
                .create(
                    admin_id,
                    NotificationKind::LowStock,
                    title,
                    &message,
                    Some(product_id),
                    None,
                    Some(&payload),
                )
                .await
            {
                warn!(admin_id = %admin_id, product_id = %product_id, error = %e,
                      "Failed to deliver low stock alert");
            }
        }

        info!(product_id = %product_id, quantity, threshold, "Low stock alerts ensured");
        Ok(())
    }

    /// Remove unread low-stock alerts for a product after a restock.
    pub async fn clear_low_stock(&self, product_id: Uuid) -> AppResult<()> {
        let cleared = self.notif_repo.delete_unread_low_stock(product_id).await?;
        if cleared > 0 {
            info!(product_id = %product_id, cleared, "Low stock alerts cleared");
        }
        Ok(())
    }

    /// Tell every admin a new order was placed.
    pub async fn notify_admins_order_created(
        &self,
        order: &Order,
        item_count: usize,
        buyer_name: &str,
    ) -> AppResult<()> {
        let title = "New order received";
        let message = format!(
            "{buyer_name} placed an order totaling {} ({} item{})",
            order.total_amount,
            item_count,
            if item_count == 1 { "" } else { "s" }
        );
        let payload = json!({
            "total_amount": order.total_amount,
            "status": order.status,
            "item_count": item_count,
        });

        for admin_id in self.user_repo.find_admin_ids().await? {
            if let Err(e) = self
                .notif_repo
                .create(
                    admin_id,
                    NotificationKind::OrderCreated,
                    title,
                    &message,
                    None,
                    Some(order.id),
                    Some(&payload),
                )
                .await
            {
                warn!(admin_id = %admin_id, order_id = %order.id, error = %e,
                      "Failed to deliver order-created alert");
            }
        }
        Ok(())
    }

    /// Tell every admin an order moved to a new status.
    pub async fn notify_admins_order_status_changed(
        &self,
        order: &Order,
        old_status: OrderStatus,
        new_status: OrderStatus,
    ) -> AppResult<()> {
        let title = "Order status changed";
        let message = format!("Order moved from {old_status} to {new_status}");
        let payload = json!({
            "old_status": old_status,
            "new_status": new_status,
        });

        for admin_id in self.user_repo.find_admin_ids().await? {
            if let Err(e) = self
                .notif_repo
                .create(
                    admin_id,
                    NotificationKind::OrderStatusChanged,
                    title,
                    &message,
                    None,
                    Some(order.id),
                    Some(&payload),
                )
                .await
            {
                warn!(admin_id = %admin_id, order_id = %order.id, error = %e,
                      "Failed to deliver status-change alert");
            }
        }
        Ok(())
    }
}
