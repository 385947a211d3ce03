//! Stock ledger: available stock derived from declared stock minus the
//! quantity already committed across orders.
//!
//! Committed quantity counts orders in every status, cancelled included.
//! That conservatively under-offers stock for cancelled orders but keeps
//! the ledger a single aggregate and prevents overselling while an order
//! is under review.

use crate::error::CoreError;

/// Available stock for a product, clamped at zero.
pub fn available_stock(stock_quantity: i32, committed: i64) -> i32 {
    let available = i64::from(stock_quantity) - committed;
    available.clamp(0, i64::from(i32::MAX)) as i32
}

/// Validate that reserving `requested` more units would not oversell.
pub fn validate_reservation(
    stock_quantity: i32,
    committed: i64,
    requested: i32,
) -> Result<(), CoreError> {
    let available = available_stock(stock_quantity, committed);
    if requested > available {
        return Err(CoreError::OutOfStock {
            requested,
            available,
        });
    }
    Ok(())
}
