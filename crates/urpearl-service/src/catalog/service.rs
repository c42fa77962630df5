//! Catalog service: storefront reads and admin CRUD over products and
//! categories.

use std::sync::Arc;

use rand::distr::{Alphanumeric, SampleString};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::types::pagination::{PageRequest, PageResponse};
use urpearl_core::AppError;
use urpearl_database::repositories::{
    CategoryRepository, InventoryRepository, ProductFilter, ProductRepository,
};
use urpearl_entity::category::{slugify, Category};
use urpearl_entity::inventory::DEFAULT_LOW_STOCK_THRESHOLD;
use urpearl_entity::product::{CreateProduct, Product, ProductSummary, UpdateProduct};

use crate::context::RequestContext;

/// Admin input for creating a product together with its inventory row.
///
/// Slug and SKU are optional; missing values are derived from the name
/// or generated.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: Option<String>,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub is_new_arrival: bool,
    pub is_best_seller: bool,
    pub size: Option<String>,
    /// Opening stock; defaults to zero.
    pub initial_quantity: Option<i32>,
    pub low_stock_threshold: Option<i32>,
}

/// Storefront reads and admin CRUD for the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: PgPool,
    product_repo: Arc<ProductRepository>,
    category_repo: Arc<CategoryRepository>,
    inventory_repo: Arc<InventoryRepository>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(
        pool: PgPool,
        product_repo: Arc<ProductRepository>,
        category_repo: Arc<CategoryRepository>,
        inventory_repo: Arc<InventoryRepository>,
    ) -> Self {
        Self {
            pool,
            product_repo,
            category_repo,
            inventory_repo,
        }
    }

    /// List catalog products with filters, paginated.
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ProductSummary>> {
        self.product_repo.search(filter, page).await
    }

    /// Load one product summary by slug.
    pub async fn get_product_by_slug(&self, slug: &str) -> AppResult<ProductSummary> {
        self.product_repo
            .find_summary_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product '{slug}' not found")))
    }

    /// Load one product summary by id.
    pub async fn get_product_by_id(&self, id: Uuid) -> AppResult<ProductSummary> {
        self.product_repo
            .find_summary_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    /// Create a product and its inventory row in one transaction.
    pub async fn create_product(&self, ctx: &RequestContext, input: NewProduct) -> AppResult<Product> {
        ctx.require_admin()?;

        if input.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if input.price < Decimal::ZERO {
            return Err(AppError::validation("Price cannot be negative"));
        }
        let initial_quantity = input.initial_quantity.unwrap_or(0);
        if initial_quantity < 0 {
            return Err(AppError::validation("Initial quantity cannot be negative"));
        }
        let threshold = input
            .low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        if threshold < 0 {
            return Err(AppError::validation(
                "Low stock threshold cannot be negative",
            ));
        }

        let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
        let sku = match input.sku {
            Some(sku) if !sku.trim().is_empty() => sku,
            _ => generate_sku(),
        };

        if let Some(category_id) = input.category_id {
            self.category_repo
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| AppError::validation("Category does not exist"))?;
        }

        let create = CreateProduct {
            name: input.name,
            slug,
            description: input.description,
            price: input.price,
            sku,
            category_id: input.category_id,
            image_url: input.image_url,
            is_new_arrival: input.is_new_arrival,
            is_best_seller: input.is_best_seller,
            size: input.size,
        };

        let mut tx = crate::tx::begin(&self.pool).await?;
        let product = self.product_repo.create_in_tx(&mut tx, &create).await?;
        self.inventory_repo
            .create_in_tx(&mut tx, product.id, initial_quantity, threshold)
            .await?;
        crate::tx::commit(tx).await?;

        info!(
            product_id = %product.id,
            sku = %product.sku,
            admin = %ctx.user_id,
            "Product created"
        );
        Ok(product)
    }

    /// Apply a patch to a product.
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        mut patch: UpdateProduct,
    ) -> AppResult<Product> {
        ctx.require_admin()?;

        if let Some(price) = patch.price {
            if price < Decimal::ZERO {
                return Err(AppError::validation("Price cannot be negative"));
            }
        }
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Product name cannot be blank"));
            }
        }
        if let Some(slug) = patch.slug.take() {
            patch.slug = Some(resolve_slug(Some(&slug), "")?);
        }
        if let Some(category_id) = patch.category_id {
            self.category_repo
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| AppError::validation("Category does not exist"))?;
        }

        let product = self.product_repo.update(product_id, &patch).await?;
        info!(product_id = %product.id, admin = %ctx.user_id, "Product updated");
        Ok(product)
    }

    /// Delete a product and its cascading rows.
    pub async fn delete_product(&self, ctx: &RequestContext, product_id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        self.product_repo.delete(product_id).await?;
        info!(product_id = %product_id, admin = %ctx.user_id, "Product deleted");
        Ok(())
    }

    /// List all categories.
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.category_repo.find_all().await
    }

    /// Create a category, deriving the slug from the name when absent.
    pub async fn create_category(
        &self,
        ctx: &RequestContext,
        name: &str,
        slug: Option<&str>,
    ) -> AppResult<Category> {
        ctx.require_admin()?;
        if name.trim().is_empty() {
            return Err(AppError::validation("Category name is required"));
        }
        let slug = resolve_slug(slug, name)?;
        let category = self.category_repo.create(name.trim(), &slug).await?;
        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Rename a category. When no slug is supplied a fresh one is
    /// derived from the new name.
    pub async fn update_category(
        &self,
        ctx: &RequestContext,
        category_id: Uuid,
        name: &str,
        slug: Option<&str>,
    ) -> AppResult<Category> {
        ctx.require_admin()?;
        if name.trim().is_empty() {
            return Err(AppError::validation("Category name is required"));
        }
        let slug = resolve_slug(slug, name)?;
        let category = self
            .category_repo
            .update(category_id, name.trim(), &slug)
            .await?;
        info!(category_id = %category.id, "Category updated");
        Ok(category)
    }

    /// Delete a category, detaching its products.
    pub async fn delete_category(&self, ctx: &RequestContext, category_id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        self.category_repo.delete(category_id).await?;
        info!(category_id = %category_id, admin = %ctx.user_id, "Category deleted");
        Ok(())
    }
}

/// Use the given slug, or derive one from `name`. Either way the
/// result must be non-empty after normalization.
fn resolve_slug(given: Option<&str>, name: &str) -> AppResult<String> {
    let raw = match given {
        Some(s) if !s.trim().is_empty() => s,
        _ => name,
    };
    let slug = slugify(raw);
    if slug.is_empty() {
        return Err(AppError::validation(
            "Slug cannot be derived from the given name",
        ));
    }
    Ok(slug)
}

/// Generate a merchant SKU of the form `PRL-XXXXXXXX`.
fn generate_sku() -> String {
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), 8)
        .to_ascii_uppercase();
    format!("PRL-{suffix}")
}
