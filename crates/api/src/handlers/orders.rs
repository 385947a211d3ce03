//! Handlers for the `/orders` resource.
//!
//! The storefront submission is a multipart form: contact fields, product
//! selection, payment choice, and the proof-of-payment image. Nothing is
//! persisted until every validation has passed and the proof is safely in
//! object storage; a failure at any step leaves no partial order behind.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use preorder_core::catalog::Size;
use preorder_core::error::CoreError;
use preorder_core::pricing::{self, PaymentMethod, PaymentPlan};
use preorder_core::proof;
use preorder_core::types::DbId;
use preorder_db::models::order::{
    CreateOrder, Order, OrderDetail, OrderListQuery, UpdateOrderPayment, UpdateOrderStatus,
};
use preorder_db::repositories::{OrderEventRepo, OrderRepo};
use preorder_storage::PAYMENT_PROOFS_BUCKET;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Storefront submission
// ---------------------------------------------------------------------------

/// Raw multipart fields of an order submission.
#[derive(Default)]
struct SubmissionForm {
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_address: Option<String>,
    product_id: Option<String>,
    size: Option<String>,
    quantity: Option<String>,
    payment_method: Option<String>,
    payment_plan: Option<String>,
    notes: Option<String>,
    /// Proof image: (content type, bytes).
    proof: Option<(String, Vec<u8>)>,
}

/// POST /api/v1/orders
///
/// Submit a pre-order. Validates the form and the proof image, uploads the
/// proof, then atomically reserves stock and creates the order in `pending`
/// with its initial audit event. Returns 201 with the created order.
pub async fn submit_order(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Order>>)> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "proof" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.proof = Some((content_type, data.to_vec()));
            }
            "customer_name" => form.customer_name = Some(field_text(field).await?),
            "customer_phone" => form.customer_phone = Some(field_text(field).await?),
            "customer_address" => form.customer_address = Some(field_text(field).await?),
            "product_id" => form.product_id = Some(field_text(field).await?),
            "size" => form.size = Some(field_text(field).await?),
            "quantity" => form.quantity = Some(field_text(field).await?),
            "payment_method" => form.payment_method = Some(field_text(field).await?),
            "payment_plan" => form.payment_plan = Some(field_text(field).await?),
            "notes" => form.notes = Some(field_text(field).await?),
            _ => {} // ignore unknown fields
        }
    }

    // -- Contact and selection validation (nothing persisted yet) --
    let customer_name = required_field(form.customer_name, "customer_name")?;
    let customer_phone = required_field(form.customer_phone, "customer_phone")?;
    let customer_address = required_field(form.customer_address, "customer_address")?;

    let product_id: DbId = required_field(form.product_id, "product_id")?
        .parse()
        .map_err(|_| invalid_input("product_id must be an integer"))?;

    let size: Size = {
        let raw = required_field(form.size, "size")?;
        raw.parse()
            .map_err(|_| invalid_input(&format!("Unknown size '{raw}'")))?
    };

    let quantity: i32 = required_field(form.quantity, "quantity")?
        .parse()
        .map_err(|_| invalid_input("quantity must be an integer"))?;
    pricing::validate_quantity(quantity)?;

    let payment_method: PaymentMethod = required_field(form.payment_method, "payment_method")?
        .parse::<PaymentMethod>()?;
    let payment_plan: PaymentPlan =
        required_field(form.payment_plan, "payment_plan")?.parse::<PaymentPlan>()?;

    let notes = form.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

    // -- Proof validation and upload --
    let (content_type, bytes) = form.proof.ok_or(AppError::Core(CoreError::ProofMissing))?;
    proof::validate_proof(&content_type, bytes.len() as u64)?;

    let filename = proof::stored_filename(payment_method, &content_type);
    state
        .storage
        .put(PAYMENT_PROOFS_BUCKET, &filename, &bytes, &content_type)
        .await?;

    // -- Atomic reserve-and-insert --
    let input = CreateOrder {
        product_id,
        customer_name,
        customer_phone,
        customer_address,
        size,
        quantity,
        payment_method,
        payment_plan,
        payment_proof: filename,
        notes,
    };
    let order = OrderRepo::create(&state.pool, &input).await?;

    tracing::info!(
        order_id = %order.id,
        product_id,
        quantity,
        total_price = order.total_price,
        "Order submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// Extract a text field, surfacing multipart errors as 400s.
async fn field_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// A required form field: present and non-empty after trimming.
fn required_field(value: Option<String>, name: &str) -> AppResult<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(invalid_input(&format!("Field '{name}' is required")));
    }
    Ok(value)
}

fn invalid_input(msg: &str) -> AppError {
    AppError::Core(CoreError::InvalidOrderInput(msg.to_string()))
}

// ---------------------------------------------------------------------------
// Admin operations
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/orders
///
/// List orders, newest first. Supports optional `status`, `limit`, and
/// `offset` query parameters.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListQuery>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let orders = OrderRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/admin/orders/{id}
///
/// One order with its full audit trail, ascending by time.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<OrderDetail>>> {
    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: id.to_string(),
        }))?;
    let events = OrderEventRepo::list_by_order(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: OrderDetail { order, events },
    }))
}

/// PUT /api/v1/admin/orders/{id}/status
///
/// Transition an order to a new status. Illegal jumps are rejected with
/// 409; a legal transition appends exactly one audit event in the same
/// transaction.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<Json<DataResponse<Order>>> {
    let order =
        OrderRepo::update_status(&state.pool, id, input.status, input.note.as_deref()).await?;
    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/v1/admin/orders/{id}/payment
///
/// Update an order's payment terms. Switching a still-pending order to the
/// `full` plan confirms it; the change is described in the appended audit
/// event's note.
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateOrderPayment>,
) -> AppResult<Json<DataResponse<Order>>> {
    let order = OrderRepo::update_payment(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: order }))
}

/// DELETE /api/v1/admin/orders/{id}
///
/// Admin override: permanently delete an order and purge its audit trail.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = OrderRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: id.to_string(),
        }));
    }
    tracing::info!(order_id = %id, "Order deleted by admin override");
    Ok(StatusCode::NO_CONTENT)
}
