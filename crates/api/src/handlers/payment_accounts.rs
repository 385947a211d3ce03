//! Handlers for the `/payment-accounts` resource.
//!
//! Customers see only active accounts for their chosen method; everything
//! else is admin CRUD, including the barcode image upload.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use preorder_core::error::CoreError;
use preorder_core::pricing::PaymentMethod;
use preorder_core::types::DbId;
use preorder_db::models::payment_account::{
    CreatePaymentAccount, PaymentAccount, UpdatePaymentAccount,
};
use preorder_db::repositories::PaymentAccountRepo;
use preorder_storage::PAYMENT_PROOFS_BUCKET;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum accepted barcode image size: 5 MiB.
const MAX_BARCODE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Query parameters for the public listing.
#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    /// Restrict to accounts eligible for this payment method.
    pub method: Option<PaymentMethod>,
}

// ---------------------------------------------------------------------------
// Storefront
// ---------------------------------------------------------------------------

/// GET /api/v1/payment-accounts
///
/// Active payment accounts, optionally filtered by method.
pub async fn list_active(
    State(state): State<AppState>,
    Query(params): Query<AccountListQuery>,
) -> AppResult<Json<DataResponse<Vec<PaymentAccount>>>> {
    let accounts = match params.method {
        Some(method) => PaymentAccountRepo::list_active_by_method(&state.pool, method).await?,
        None => PaymentAccountRepo::list_active(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: accounts }))
}

// ---------------------------------------------------------------------------
// Admin CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/payment-accounts
pub async fn list_all(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PaymentAccount>>>> {
    let accounts = PaymentAccountRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: accounts }))
}

/// POST /api/v1/admin/payment-accounts
///
/// Create a payment account. Bank accounts must carry a number and holder
/// name. Returns 201.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePaymentAccount>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentAccount>>)> {
    if input.bank_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Display label is required".to_string(),
        )));
    }
    if input.method == PaymentMethod::Bank {
        let missing = input.account_number.as_deref().unwrap_or("").trim().is_empty()
            || input.account_name.as_deref().unwrap_or("").trim().is_empty();
        if missing {
            return Err(AppError::Core(CoreError::Validation(
                "Bank accounts require an account number and holder name".to_string(),
            )));
        }
    }

    let account = PaymentAccountRepo::create(&state.pool, &input).await?;
    tracing::info!(account_id = account.id, method = %account.method, "Payment account created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: account })))
}

/// PUT /api/v1/admin/payment-accounts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePaymentAccount>,
) -> AppResult<Json<DataResponse<PaymentAccount>>> {
    let account = PaymentAccountRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PaymentAccount",
            id: id.to_string(),
        }))?;
    Ok(Json(DataResponse { data: account }))
}

/// POST /api/v1/admin/payment-accounts/{id}/barcode
///
/// Upload the QRIS/transfer barcode image (multipart `file` field) and
/// attach its storage path to the account.
pub async fn upload_barcode(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentAccount>>)> {
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

    if bytes.is_empty() || !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(
            "Barcode uploads must be non-empty images".into(),
        ));
    }
    if bytes.len() as u64 > MAX_BARCODE_SIZE_BYTES {
        return Err(AppError::BadRequest(format!(
            "Barcode image is {} bytes; the limit is {MAX_BARCODE_SIZE_BYTES} bytes",
            bytes.len()
        )));
    }

    let extension = content_type.split('/').nth(1).unwrap_or("png");
    let filename = format!("barcode_{}.{extension}", uuid::Uuid::new_v4());

    state
        .storage
        .put(PAYMENT_PROOFS_BUCKET, &filename, &bytes, &content_type)
        .await?;

    let account = PaymentAccountRepo::set_barcode_path(&state.pool, id, &filename)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PaymentAccount",
            id: id.to_string(),
        }))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: account })))
}

/// DELETE /api/v1/admin/payment-accounts/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = PaymentAccountRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PaymentAccount",
            id: id.to_string(),
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
