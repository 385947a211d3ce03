//! Order audit trail entity model.

use preorder_core::status::OrderStatus;
use preorder_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the append-only `order_events` table.
///
/// One row exists per status transition, including the initial transition
/// into `pending`. Rows are never updated; they are deleted only together
/// with their parent order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderEvent {
    pub id: DbId,
    pub order_id: Uuid,
    /// The canonical status the order held after this transition.
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub note: Option<String>,
    pub created_at: Timestamp,
}
