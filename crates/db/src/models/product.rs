//! Product entity models and DTOs.

use preorder_core::catalog::{ProductStatus, SizeSet};
use preorder_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in whole currency units.
    pub price: i64,
    /// Pre-discount price, shown struck through when present.
    pub original_price: Option<i64>,
    /// Ordered object-storage paths of the product images.
    pub image_paths: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ProductStatus,
    pub po_start_date: Option<Timestamp>,
    pub po_end_date: Option<Timestamp>,
    #[sqlx(try_from = "Vec<String>")]
    pub available_sizes: SizeSet,
    pub stock_quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product via `POST /api/v1/admin/products`.
///
/// New products always start in `draft` status.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub po_start_date: Option<Timestamp>,
    pub po_end_date: Option<Timestamp>,
    #[serde(default)]
    pub available_sizes: SizeSet,
    #[serde(default)]
    pub stock_quantity: i32,
}

/// DTO for updating a product. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub po_start_date: Option<Timestamp>,
    pub po_end_date: Option<Timestamp>,
    pub available_sizes: Option<SizeSet>,
    pub stock_quantity: Option<i32>,
}

/// A product together with its stock ledger snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithStock {
    #[serde(flatten)]
    pub product: Product,
    /// Total quantity committed across all orders, regardless of status.
    pub committed_quantity: i64,
    /// Declared stock minus committed quantity, clamped at zero.
    pub available_stock: i32,
}
