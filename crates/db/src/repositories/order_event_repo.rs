//! Read access to the append-only `order_events` audit trail.
//!
//! Inserts happen exclusively inside [`super::OrderRepo`] transactions so
//! an event can never exist without its status write (or vice versa).

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::order_event::OrderEvent;

/// Column list shared across queries.
const COLUMNS: &str = "id, order_id, status, note, created_at";

/// Provides query operations for order audit events.
pub struct OrderEventRepo;

impl OrderEventRepo {
    /// List all events for an order, ascending by occurrence time.
    pub async fn list_by_order(
        pool: &PgPool,
        order_id: Uuid,
    ) -> Result<Vec<OrderEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM order_events \
             WHERE order_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, OrderEvent>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }
}
