//! Handlers for the `/products` resource.
//!
//! The storefront sees only `active` products, always together with their
//! stock ledger snapshot. Everything else is admin-side CRUD.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use preorder_core::catalog::{self, ProductStatus};
use preorder_core::error::CoreError;
use preorder_core::types::DbId;
use preorder_db::models::product::{CreateProduct, Product, ProductWithStock, UpdateProduct};
use preorder_db::repositories::ProductRepo;
use preorder_storage::PRODUCT_IMAGES_BUCKET;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum accepted product image size: 5 MiB.
const MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Storefront
// ---------------------------------------------------------------------------

/// GET /api/v1/products
///
/// Active products with their stock snapshot, newest first.
pub async fn list_active(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProductWithStock>>>> {
    let products = ProductRepo::list_active_with_stock(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
///
/// One active product with its stock snapshot. Draft and closed products
/// are invisible to the storefront and return 404.
pub async fn get_active(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductWithStock>>> {
    let product = ProductRepo::find_with_stock(&state.pool, id)
        .await?
        .filter(|p| p.product.status == ProductStatus::Active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: id.to_string(),
        }))?;
    Ok(Json(DataResponse { data: product }))
}

// ---------------------------------------------------------------------------
// Admin CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/products
pub async fn list_all(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/admin/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductWithStock>>> {
    let product = ProductRepo::find_with_stock(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: id.to_string(),
        }))?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/admin/products
///
/// Create a product in `draft` status. Returns 201.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Product name is required".to_string(),
        )));
    }
    if input.price < 0 || input.stock_quantity < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price and stock quantity must be non-negative".to_string(),
        )));
    }

    let product = ProductRepo::create(&state.pool, &input).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/admin/products/{id}
///
/// Update product fields. Only provided fields are applied.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<DataResponse<Product>>> {
    if matches!(input.price, Some(p) if p < 0)
        || matches!(input.stock_quantity, Some(q) if q < 0)
    {
        return Err(AppError::Core(CoreError::Validation(
            "Price and stock quantity must be non-negative".to_string(),
        )));
    }

    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: id.to_string(),
        }))?;
    Ok(Json(DataResponse { data: product }))
}

/// DTO for `PUT /api/v1/admin/products/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetProductStatus {
    pub status: ProductStatus,
}

/// PUT /api/v1/admin/products/{id}/status
///
/// Move a product through its lifecycle. Activation checks the storefront
/// invariants (positive price, at least one size) first.
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetProductStatus>,
) -> AppResult<Json<DataResponse<Product>>> {
    if input.status == ProductStatus::Active {
        let current = ProductRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Product",
                id: id.to_string(),
            }))?;
        catalog::validate_active_product(current.price, &current.available_sizes)?;
    }

    let product = ProductRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: id.to_string(),
        }))?;

    tracing::info!(product_id = id, status = %product.status, "Product status changed");
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/admin/products/{id}/images
///
/// Upload a product image (multipart `file` field) and append its storage
/// path to the product's ordered image list.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((content_type, data.to_vec()));
        }
    }

    let (content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    validate_image_upload(&content_type, bytes.len() as u64)?;

    let extension = content_type.split('/').nth(1).unwrap_or("png");
    let filename = format!("product_{id}_{}.{extension}", uuid::Uuid::new_v4());

    state
        .storage
        .put(PRODUCT_IMAGES_BUCKET, &filename, &bytes, &content_type)
        .await?;

    let product = ProductRepo::append_image_path(&state.pool, id, &filename)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: id.to_string(),
        }))?;

    tracing::info!(product_id = id, filename = %filename, "Product image uploaded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// DELETE /api/v1/admin/products/{id}
///
/// Permanently delete a product. Returns 409 while orders still reference
/// it (surfaced from the foreign-key constraint).
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProductRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: id.to_string(),
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Catalog images share the proof rules: an `image/*` MIME type and a
/// bounded size, but with their own error copy.
fn validate_image_upload(content_type: &str, len: u64) -> Result<(), AppError> {
    if len == 0 {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "Uploads must be images, got '{content_type}'"
        )));
    }
    if len > MAX_IMAGE_SIZE_BYTES {
        return Err(AppError::BadRequest(format!(
            "Image is {len} bytes; the limit is {MAX_IMAGE_SIZE_BYTES} bytes"
        )));
    }
    Ok(())
}
