//! Request bodies and query parameters.
//!
//! Bodies carry `validator` rules for shape checks (required fields,
//! ranges, lengths). Anything that needs database state to judge, like
//! stock levels or purchase history, is validated in the service layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use urpearl_core::types::PageRequest;
use urpearl_core::{AppError, AppResult};
use urpearl_database::repositories::{ProductFilter, ProductSort};
use urpearl_entity::{NewOrderItem, OrderStatus, ShippingAddress, UpsertUser};
use urpearl_service::{BulkInventoryUpdate, NewProduct};
use uuid::Uuid;
use validator::Validate;

/// Runs the derived `validator` rules and converts failures into a
/// validation error whose details carry the per-field messages.
pub fn validated<T: Validate>(body: T) -> AppResult<T> {
    match body.validate() {
        Ok(()) => Ok(body),
        Err(errors) => {
            let details = serde_json::to_value(&errors).unwrap_or(serde_json::Value::Null);
            Err(AppError::validation("Request validation failed").with_details(details))
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

// ── Auth ────────────────────────────────────────────────────────────────────

/// Body of `POST /api/auth/oauth`.
#[derive(Debug, Deserialize, Validate)]
pub struct OAuthSignInRequest {
    #[validate(length(min = 1, message = "Provider is required"))]
    pub provider: String,
    #[validate(length(min = 1, message = "Provider ID is required"))]
    pub provider_id: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub avatar_url: Option<String>,
}

impl OAuthSignInRequest {
    pub fn into_upsert(self) -> UpsertUser {
        UpsertUser {
            name: self.name,
            email: self.email,
            avatar_url: self.avatar_url,
            provider: self.provider,
            provider_id: self.provider_id,
        }
    }
}

// ── Cart and checkout ───────────────────────────────────────────────────────

/// Body of `POST /api/cart/items`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Body of `PUT /api/cart/items/{id}`. A quantity of zero or less
/// removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// Shipping address as submitted at checkout.
#[derive(Debug, Deserialize, Validate)]
pub struct ShippingAddressRequest {
    #[validate(length(min = 1, max = 255, message = "Recipient name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Address line is required"))]
    pub line1: String,
    pub line2: Option<String>,
    #[validate(length(min = 1, max = 120, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 120, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, max = 32, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 64, message = "Country is required"))]
    pub country: String,
    pub phone: Option<String>,
}

impl ShippingAddressRequest {
    pub fn into_address(self) -> ShippingAddress {
        ShippingAddress {
            name: self.name,
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            phone: self.phone,
        }
    }
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "payment_intent_id is required"))]
    pub payment_intent_id: String,
    #[validate(nested)]
    pub shipping_address: ShippingAddressRequest,
}

// ── Ratings ─────────────────────────────────────────────────────────────────

/// Body of `POST /api/products/{id}/ratings`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRatingRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 1000, message = "Review must be at most 1000 characters"))]
    pub review: Option<String>,
}

/// Body of `PUT /api/ratings/{id}`. Absent fields keep their value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRatingRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 1000, message = "Review must be at most 1000 characters"))]
    pub review: Option<String>,
}

// ── Admin: catalog ──────────────────────────────────────────────────────────

/// Body of `POST /api/admin/products`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: Option<String>,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub is_best_seller: bool,
    pub size: Option<String>,
    #[validate(range(min = 0, message = "Initial quantity cannot be negative"))]
    pub initial_quantity: Option<i32>,
    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub low_stock_threshold: Option<i32>,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            sku: self.sku,
            category_id: self.category_id,
            image_url: self.image_url,
            is_new_arrival: self.is_new_arrival,
            is_best_seller: self.is_best_seller,
            size: self.size,
            initial_quantity: self.initial_quantity,
            low_stock_threshold: self.low_stock_threshold,
        }
    }
}

/// Body of `POST /api/admin/categories` and `PUT /api/admin/categories/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 120, message = "Category name is required"))]
    pub name: String,
    pub slug: Option<String>,
}

// ── Admin: inventory ────────────────────────────────────────────────────────

/// Body of `PUT /api/admin/inventory/{product_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStockRequest {
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
}

/// Body of `POST /api/admin/inventory/{product_id}/adjust`. Positive
/// deltas add stock, negative deltas remove it.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i32,
}

/// Body of `PUT /api/admin/inventory/{product_id}/threshold`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateThresholdRequest {
    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub low_stock_threshold: i32,
}

/// Body of `POST /api/admin/inventory/bulk`.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkInventoryRequest {
    #[validate(length(min = 1, message = "At least one update is required"))]
    pub updates: Vec<BulkInventoryEntry>,
}

/// One entry of a bulk inventory update.
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkInventoryEntry {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl BulkInventoryRequest {
    pub fn into_updates(self) -> Vec<BulkInventoryUpdate> {
        self.updates
            .into_iter()
            .map(|entry| BulkInventoryUpdate {
                product_id: entry.product_id,
                quantity: entry.quantity,
            })
            .collect()
    }
}

// ── Admin: orders ───────────────────────────────────────────────────────────

/// Body of `POST /api/admin/orders`: back-office order creation from
/// an explicit item list. Leaving `user_id` empty places the order on
/// the acting admin.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<NewOrderItem>,
    #[validate(nested)]
    pub shipping_address: ShippingAddressRequest,
}

/// Body of `PUT /api/admin/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// ── Query parameters ────────────────────────────────────────────────────────

/// Query string of `GET /api/products`.
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Category slug to filter by.
    pub category: Option<String>,
    /// Substring search over name, SKU and description.
    pub search: Option<String>,
    pub new_arrivals: Option<bool>,
    pub best_sellers: Option<bool>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductListParams {
    pub fn into_parts(self) -> (ProductFilter, PageRequest) {
        let page = PageRequest::new(self.page, self.per_page);
        let filter = ProductFilter {
            category_slug: self.category,
            search: self.search,
            is_new_arrival: self.new_arrivals,
            is_best_seller: self.best_sellers,
            sort: self.sort,
        };
        (filter, page)
    }
}

/// Query string of `GET /api/admin/orders`.
#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub status: Option<OrderStatus>,
}

impl OrderListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Query string of `GET /api/admin/notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    #[serde(default)]
    pub unread_only: bool,
}

impl NotificationListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}
