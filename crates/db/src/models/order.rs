//! Order entity models and DTOs.

use preorder_core::catalog::Size;
use preorder_core::pricing::{PaymentMethod, PaymentPlan};
use preorder_core::status::OrderStatus;
use preorder_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::order_event::OrderEvent;

/// A row from the `orders` table.
///
/// The money fields are a snapshot frozen at creation time; later price
/// changes on the product never alter an existing order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: Uuid,
    /// Public tracking code: last 4 hex characters of `id`, indexed.
    pub short_code: String,
    pub product_id: DbId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    #[sqlx(try_from = "String")]
    pub size: Size,
    pub quantity: i32,
    pub total_price: i64,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    #[sqlx(try_from = "String")]
    pub payment_plan: PaymentPlan,
    /// Amount due (or already paid) now; `total_price` for the full plan.
    pub payment_amount: i64,
    /// Balance collected later; zero unless the plan is `dp50`.
    pub remaining_amount: i64,
    /// Object-storage path of the uploaded proof image.
    pub payment_proof: String,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated order submission, ready for the atomic reserve-and-insert.
///
/// Pricing is intentionally absent: totals are computed inside the creation
/// transaction from the locked product row, so the frozen snapshot can
/// never disagree with the price the stock was reserved under.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub product_id: DbId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub size: Size,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub payment_plan: PaymentPlan,
    pub payment_proof: String,
    pub notes: Option<String>,
}

/// Query parameters for `GET /api/v1/admin/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    /// Filter by status.
    pub status: Option<OrderStatus>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// DTO for `PUT /api/v1/admin/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
    pub note: Option<String>,
}

/// DTO for `PUT /api/v1/admin/orders/{id}/payment`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderPayment {
    pub payment_plan: PaymentPlan,
    pub payment_method: PaymentMethod,
    pub payment_amount: i64,
    pub note: Option<String>,
}

/// An order together with its full audit trail, ascending by time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub events: Vec<OrderEvent>,
}
