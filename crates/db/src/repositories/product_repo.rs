//! Repository for the `products` table.

use preorder_core::catalog::ProductStatus;
use preorder_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::models::product::{CreateProduct, Product, ProductWithStock, UpdateProduct};

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, name, description, price, original_price, image_paths, \
    status, po_start_date, po_end_date, available_sizes, stock_quantity, \
    created_at, updated_at";

/// Column list with the `p.` prefix, for joined stock queries.
const P_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.original_price, \
    p.image_paths, p.status, p.po_start_date, p.po_end_date, p.available_sizes, \
    p.stock_quantity, p.created_at, p.updated_at";

/// Intermediate row for the joined stock queries.
#[derive(FromRow)]
struct ProductStockRow {
    #[sqlx(flatten)]
    product: Product,
    committed_quantity: i64,
}

impl ProductStockRow {
    fn into_with_stock(self) -> ProductWithStock {
        let available_stock = preorder_core::stock::available_stock(
            self.product.stock_quantity,
            self.committed_quantity,
        );
        ProductWithStock {
            product: self.product,
            committed_quantity: self.committed_quantity,
            available_stock,
        }
    }
}

/// Provides CRUD and stock-snapshot operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product in `draft` status.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (name, description, price, original_price, po_start_date, po_end_date,
                 available_sizes, stock_quantity)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.original_price)
            .bind(input.po_start_date)
            .bind(input.po_end_date)
            .bind(input.available_sizes.as_wire())
            .bind(input.stock_quantity)
            .fetch_one(pool)
            .await
    }

    /// Find a product by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all products regardless of status (admin view), newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY created_at DESC");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// List active products with their stock ledger snapshot, newest first.
    ///
    /// Committed quantity aggregates order quantities in every status;
    /// cancelled orders intentionally still count.
    pub async fn list_active_with_stock(
        pool: &PgPool,
    ) -> Result<Vec<ProductWithStock>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}, COALESCE(SUM(o.quantity), 0)::BIGINT AS committed_quantity
             FROM products p
             LEFT JOIN orders o ON o.product_id = p.id
             WHERE p.status = 'active'
             GROUP BY p.id
             ORDER BY p.created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProductStockRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ProductStockRow::into_with_stock).collect())
    }

    /// Find one product (any status) with its stock ledger snapshot.
    pub async fn find_with_stock(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithStock>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}, COALESCE(SUM(o.quantity), 0)::BIGINT AS committed_quantity
             FROM products p
             LEFT JOIN orders o ON o.product_id = p.id
             WHERE p.id = $1
             GROUP BY p.id"
        );
        let row = sqlx::query_as::<_, ProductStockRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(ProductStockRow::into_with_stock))
    }

    /// Update a product. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                original_price = COALESCE($5, original_price),
                po_start_date = COALESCE($6, po_start_date),
                po_end_date = COALESCE($7, po_end_date),
                available_sizes = COALESCE($8, available_sizes),
                stock_quantity = COALESCE($9, stock_quantity),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.original_price)
            .bind(input.po_start_date)
            .bind(input.po_end_date)
            .bind(input.available_sizes.as_ref().map(|s| s.as_wire()))
            .bind(input.stock_quantity)
            .fetch_optional(pool)
            .await
    }

    /// Set a product's lifecycle status.
    ///
    /// Returns `None` if no row with the given `id` exists. Invariant
    /// checks for the `active` status live in the caller, which has the
    /// full row at hand.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ProductStatus,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Append an uploaded image path to the product's ordered image list.
    pub async fn append_image_path(
        pool: &PgPool,
        id: DbId,
        path: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET image_paths = array_append(image_paths, $2), updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(path)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a product. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while orders still reference the
    /// product; that is intentional, orders are never orphaned silently.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
