//! Repository for the `orders` table and its audit trail.
//!
//! Every write that touches an order's status also appends its audit event
//! inside the same transaction, so the displayed status and the event
//! trail cannot diverge.

use preorder_core::catalog::SizeSet;
use preorder_core::error::CoreError;
use preorder_core::pricing::{self, PaymentPlan};
use preorder_core::status::{self, OrderStatus};
use preorder_core::types::DbId;
use preorder_core::{stock, tracking};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::order::{CreateOrder, Order, OrderListQuery, UpdateOrderPayment};

/// Column list shared across queries.
const COLUMNS: &str = "id, short_code, product_id, customer_name, customer_phone, \
    customer_address, size, quantity, total_price, payment_method, payment_plan, \
    payment_amount, remaining_amount, payment_proof, notes, status, \
    created_at, updated_at";

/// Failure modes of order writes that can be rejected on domain grounds
/// inside their transaction.
#[derive(Debug, thiserror::Error)]
pub enum OrderWriteError {
    #[error("Order {0} not found")]
    OrderNotFound(Uuid),

    #[error("Product {0} not found")]
    ProductNotFound(DbId),

    #[error("Product is not open for orders")]
    ProductNotActive,

    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Provides creation, lifecycle, and lookup operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Atomically reserve stock and insert a new order.
    ///
    /// One transaction: the product row is locked, committed quantity is
    /// recomputed under the lock, the reservation is rejected if it would
    /// oversell, totals are computed from the locked row's price and frozen
    /// onto the order, and the initial `pending` audit event is appended.
    /// Two concurrent submissions therefore cannot jointly exceed declared
    /// stock.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, OrderWriteError> {
        let mut tx = pool.begin().await?;

        // Lock the product row; this serializes reservations per product.
        let product: Option<(i64, String, Vec<String>, i32)> = sqlx::query_as(
            "SELECT price, status, available_sizes, stock_quantity \
             FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (price, product_status, sizes, stock_quantity) =
            product.ok_or(OrderWriteError::ProductNotFound(input.product_id))?;

        if product_status != "active" {
            return Err(OrderWriteError::ProductNotActive);
        }

        let available_sizes = SizeSet::try_from(sizes)?;
        if !available_sizes.contains(input.size) {
            return Err(CoreError::InvalidOrderInput(format!(
                "Size {} is not offered for this product",
                input.size
            ))
            .into());
        }

        let committed: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM orders WHERE product_id = $1",
        )
        .bind(input.product_id)
        .fetch_one(&mut *tx)
        .await?;

        stock::validate_reservation(stock_quantity, committed, input.quantity)?;

        let total_price = pricing::compute_total(price, input.quantity)?;
        let due = pricing::compute_due(total_price, input.payment_plan);

        let id = Uuid::new_v4();
        let short_code = tracking::short_code_from_id(&id);

        let query = format!(
            "INSERT INTO orders
                (id, short_code, product_id, customer_name, customer_phone,
                 customer_address, size, quantity, total_price, payment_method,
                 payment_plan, payment_amount, remaining_amount, payment_proof,
                 notes, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(&short_code)
            .bind(input.product_id)
            .bind(&input.customer_name)
            .bind(&input.customer_phone)
            .bind(&input.customer_address)
            .bind(input.size.as_str())
            .bind(input.quantity)
            .bind(total_price)
            .bind(input.payment_method.as_str())
            .bind(input.payment_plan.as_str())
            .bind(due.amount_due)
            .bind(due.remaining)
            .bind(&input.payment_proof)
            .bind(&input.notes)
            .bind(OrderStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;

        // Initial transition into `pending`.
        sqlx::query("INSERT INTO order_events (order_id, status, note) VALUES ($1, $2, $3)")
            .bind(order.id)
            .bind(OrderStatus::Pending.as_str())
            .bind(Option::<String>::None)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Find an order by its UUID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List orders with optional status filter and pagination, newest first.
    pub async fn list(pool: &PgPool, params: &OrderListQuery) -> Result<Vec<Order>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).min(100);
        let offset = params.offset.unwrap_or(0);

        match params.status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM orders WHERE status = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Order>(&query)
                    .bind(status.as_str())
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM orders \
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Order>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Find all orders whose tracking code matches, newest first.
    ///
    /// The code column is indexed; ambiguous codes return every match.
    pub async fn find_by_short_code(
        pool: &PgPool,
        short_code: &str,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE short_code = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(short_code)
            .fetch_all(pool)
            .await
    }

    /// Transition an order to a new status and append the audit event, as
    /// one transaction.
    ///
    /// The order row is locked first so concurrent transitions serialize;
    /// an illegal transition rolls everything back.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        new_status: OrderStatus,
        note: Option<&str>,
    ) -> Result<Order, OrderWriteError> {
        let mut tx = pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current: OrderStatus = current
            .ok_or(OrderWriteError::OrderNotFound(id))?
            .parse()
            .map_err(OrderWriteError::Domain)?;

        status::validate_transition(current, new_status)?;

        let query = format!(
            "UPDATE orders SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(new_status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO order_events (order_id, status, note) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(new_status.as_str())
            .bind(note)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %id,
            from = %current,
            to = %new_status,
            "Order status updated",
        );
        Ok(order)
    }

    /// Update an order's payment terms and append the audit event, as one
    /// transaction.
    ///
    /// Switching to the `full` plan on a still-pending order confirms it;
    /// otherwise the status is left unchanged. The appended event records
    /// the resulting canonical status with the payment change described in
    /// the note text.
    pub async fn update_payment(
        pool: &PgPool,
        id: Uuid,
        input: &UpdateOrderPayment,
    ) -> Result<Order, OrderWriteError> {
        let mut tx = pool.begin().await?;

        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT status, total_price FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (current, total_price) = row.ok_or(OrderWriteError::OrderNotFound(id))?;
        let current: OrderStatus = current.parse().map_err(OrderWriteError::Domain)?;

        validate_payment_amount(input.payment_plan, input.payment_amount, total_price)?;
        let remaining = total_price - input.payment_amount;

        let new_status =
            if input.payment_plan == PaymentPlan::Full && current == OrderStatus::Pending {
                OrderStatus::Confirmed
            } else {
                current
            };

        let query = format!(
            "UPDATE orders SET
                payment_plan = $2,
                payment_method = $3,
                payment_amount = $4,
                remaining_amount = $5,
                status = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(input.payment_plan.as_str())
            .bind(input.payment_method.as_str())
            .bind(input.payment_amount)
            .bind(remaining)
            .bind(new_status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let mut note = format!(
            "Payment updated: {} - {} - {}",
            input.payment_method.as_str().to_uppercase(),
            input.payment_plan.label(),
            input.payment_amount,
        );
        if let Some(extra) = input.note.as_deref().filter(|n| !n.trim().is_empty()) {
            note.push_str(" | Note: ");
            note.push_str(extra);
        }

        sqlx::query("INSERT INTO order_events (order_id, status, note) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(new_status.as_str())
            .bind(&note)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(order_id = %id, plan = %input.payment_plan, "Order payment updated");
        Ok(order)
    }

    /// Permanently delete an order and purge its audit trail, as one
    /// transaction. Admin override only.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM order_events WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

/// The spend must stay inside the order's own frozen total: a `full` plan
/// means the whole total is paid, a `dp50` plan any partial amount.
fn validate_payment_amount(
    plan: PaymentPlan,
    amount: i64,
    total_price: i64,
) -> Result<(), CoreError> {
    if amount < 0 || amount > total_price {
        return Err(CoreError::InvalidOrderInput(format!(
            "Payment amount {amount} must be between 0 and the order total {total_price}"
        )));
    }
    if plan == PaymentPlan::Full && amount != total_price {
        return Err(CoreError::InvalidOrderInput(format!(
            "Full payment must equal the order total {total_price}, got {amount}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_plan_requires_exact_total() {
        assert!(validate_payment_amount(PaymentPlan::Full, 300_000, 300_000).is_ok());
        assert!(validate_payment_amount(PaymentPlan::Full, 150_000, 300_000).is_err());
    }

    #[test]
    fn dp50_accepts_partial_amounts() {
        assert!(validate_payment_amount(PaymentPlan::Dp50, 150_000, 300_000).is_ok());
        assert!(validate_payment_amount(PaymentPlan::Dp50, 0, 300_000).is_ok());
    }

    #[test]
    fn amount_outside_total_rejected() {
        assert!(validate_payment_amount(PaymentPlan::Dp50, -1, 300_000).is_err());
        assert!(validate_payment_amount(PaymentPlan::Dp50, 300_001, 300_000).is_err());
    }
}
