//! Product repository implementation.
//!
//! Listing queries return [`ProductSummary`] rows: the product joined
//! with its inventory counters and a rating aggregate, so the
//! storefront never needs a second round trip per product.

use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::types::pagination::{PageRequest, PageResponse};
use urpearl_core::{AppError, ErrorKind};
use urpearl_entity::product::{CreateProduct, Product, ProductSummary, UpdateProduct};

/// Shared SELECT for the product summary read model.
const SUMMARY_SELECT: &str = "SELECT p.id, p.name, p.slug, p.description, p.price, p.sku, \
       p.category_id, c.name AS category_name, p.image_url, \
       p.is_new_arrival, p.is_best_seller, p.size, \
       i.quantity AS quantity, i.low_stock_threshold AS low_stock_threshold, \
       COALESCE(r.average, 0::float8) AS average_rating, \
       COALESCE(r.count, 0) AS rating_count, \
       p.created_at, p.updated_at \
     FROM products p \
     LEFT JOIN categories c ON c.id = p.category_id \
     LEFT JOIN inventories i ON i.product_id = p.id \
     LEFT JOIN (SELECT product_id, AVG(rating)::float8 AS average, COUNT(*) AS count \
                FROM ratings GROUP BY product_id) r ON r.product_id = p.id";

/// Filter conditions shared by the search and count queries. A NULL
/// bind means the condition is not applied.
const FILTER_WHERE: &str = "($1::text IS NULL OR c.slug = $1) \
     AND ($2::text IS NULL OR p.name ILIKE $2 OR p.sku ILIKE $2 \
          OR COALESCE(p.description, '') ILIKE $2) \
     AND ($3::boolean IS NULL OR p.is_new_arrival = $3) \
     AND ($4::boolean IS NULL OR p.is_best_seller = $4)";

/// Sort orders accepted by the catalog listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Most recently created first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    /// Highest average rating first.
    TopRated,
}

impl ProductSort {
    /// ORDER BY clause for this sort, over the summary select's output
    /// columns.
    fn order_clause(&self) -> &'static str {
        match self {
            ProductSort::Newest => "created_at DESC",
            ProductSort::PriceAsc => "price ASC",
            ProductSort::PriceDesc => "price DESC",
            ProductSort::NameAsc => "name ASC",
            ProductSort::TopRated => "average_rating DESC, rating_count DESC",
        }
    }
}

/// Catalog listing filters. All fields are optional and combine with
/// AND semantics.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Restrict to one category by slug.
    pub category_slug: Option<String>,
    /// Case-insensitive substring match over name, SKU and description.
    pub search: Option<String>,
    pub is_new_arrival: Option<bool>,
    pub is_best_seller: Option<bool>,
    pub sort: ProductSort,
}

/// Repository for product CRUD and catalog queries.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a product row by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find product by id", e)
            })
    }

    /// Find a product row by primary key inside an open transaction.
    pub async fn find_by_id_in_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find product by id", e)
            })
    }

    /// Find a product row by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find product by slug", e)
            })
    }

    /// Find a product summary by primary key.
    pub async fn find_summary_by_id(&self, id: Uuid) -> AppResult<Option<ProductSummary>> {
        let sql = format!("{SUMMARY_SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, ProductSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load product summary", e)
            })
    }

    /// Find a product summary by slug.
    pub async fn find_summary_by_slug(&self, slug: &str) -> AppResult<Option<ProductSummary>> {
        let sql = format!("{SUMMARY_SELECT} WHERE p.slug = $1");
        sqlx::query_as::<_, ProductSummary>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load product summary", e)
            })
    }

    /// Search the catalog with optional filters, paginated.
    pub async fn search(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ProductSummary>> {
        let pattern = filter.search.as_ref().map(|q| format!("%{q}%"));

        let count_sql = format!(
            "SELECT COUNT(*) FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE {FILTER_WHERE}"
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&filter.category_slug)
            .bind(&pattern)
            .bind(filter.is_new_arrival)
            .bind(filter.is_best_seller)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count products", e)
            })?;

        let list_sql = format!(
            "{SUMMARY_SELECT} WHERE {FILTER_WHERE} ORDER BY {} LIMIT $5 OFFSET $6",
            filter.sort.order_clause()
        );
        let products = sqlx::query_as::<_, ProductSummary>(&list_sql)
            .bind(&filter.category_slug)
            .bind(&pattern)
            .bind(filter.is_new_arrival)
            .bind(filter.is_best_seller)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search products", e)
            })?;

        Ok(PageResponse::new(
            products,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Insert a product as part of an open transaction.
    pub async fn create_in_tx(
        &self,
        conn: &mut PgConnection,
        data: &CreateProduct,
    ) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products \
               (name, slug, description, price, sku, category_id, image_url, \
                is_new_arrival, is_best_seller, size) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(&data.sku)
        .bind(data.category_id)
        .bind(&data.image_url)
        .bind(data.is_new_arrival)
        .bind(data.is_best_seller)
        .bind(&data.size)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("products_slug_key") =>
            {
                AppError::conflict(format!("Product slug '{}' already exists", data.slug))
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("products_sku_key") => {
                AppError::conflict(format!("SKU '{}' already exists", data.sku))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create product", e),
        })
    }

    /// Apply a patch to a product. Absent fields keep their value.
    pub async fn update(&self, id: Uuid, data: &UpdateProduct) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET \
               name = COALESCE($2, name), \
               slug = COALESCE($3, slug), \
               description = COALESCE($4, description), \
               price = COALESCE($5, price), \
               sku = COALESCE($6, sku), \
               category_id = COALESCE($7, category_id), \
               image_url = COALESCE($8, image_url), \
               is_new_arrival = COALESCE($9, is_new_arrival), \
               is_best_seller = COALESCE($10, is_best_seller), \
               size = COALESCE($11, size), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(&data.sku)
        .bind(data.category_id)
        .bind(&data.image_url)
        .bind(data.is_new_arrival)
        .bind(data.is_best_seller)
        .bind(&data.size)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("products_slug_key") =>
            {
                AppError::conflict("Product slug already exists".to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("products_sku_key") => {
                AppError::conflict("SKU already exists".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update product", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    /// Delete a product. Inventory, cart lines and ratings cascade;
    /// order history blocks the delete.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("order_items_product_id_fkey") =>
                {
                    AppError::conflict(
                        "Product has order history and cannot be deleted".to_string(),
                    )
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to delete product", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {id} not found")));
        }
        Ok(())
    }
}
