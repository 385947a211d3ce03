//! Order pricing: total price and the due/remaining split per payment plan.
//!
//! All monetary values are whole currency units (the display locale uses
//! zero fraction digits); no fractional amounts are ever persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Minimum quantity per order.
pub const MIN_QUANTITY: i32 = 1;

/// Maximum quantity per order.
pub const MAX_QUANTITY: i32 = 10;

/// How much of the total is due at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPlan {
    /// The full total is due now.
    Full,
    /// A 50% down payment is due now; the rest is collected later.
    Dp50,
}

impl PaymentPlan {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentPlan::Full => "full",
            PaymentPlan::Dp50 => "dp50",
        }
    }

    /// Human-readable label used in audit notes.
    pub fn label(self) -> &'static str {
        match self {
            PaymentPlan::Full => "Full payment",
            PaymentPlan::Dp50 => "DP 50%",
        }
    }
}

impl fmt::Display for PaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentPlan {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(PaymentPlan::Full),
            "dp50" => Ok(PaymentPlan::Dp50),
            other => Err(CoreError::InvalidOrderInput(format!(
                "Unknown payment plan '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for PaymentPlan {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Qris,
    Bank,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Qris => "qris",
            PaymentMethod::Bank => "bank",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qris" => Ok(PaymentMethod::Qris),
            "bank" => Ok(PaymentMethod::Bank),
            other => Err(CoreError::InvalidOrderInput(format!(
                "Unknown payment method '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The due-now / remaining split of an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentBreakdown {
    pub amount_due: i64,
    pub remaining: i64,
}

/// Validate that a quantity is within the accepted per-order bound.
pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(CoreError::InvalidOrderInput(format!(
            "Quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Total price for `quantity` units at `price` each.
pub fn compute_total(price: i64, quantity: i32) -> Result<i64, CoreError> {
    validate_quantity(quantity)?;
    if price < 0 {
        return Err(CoreError::InvalidOrderInput(format!(
            "Price must be non-negative, got {price}"
        )));
    }
    price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| CoreError::InvalidOrderInput("Total price overflows".to_string()))
}

/// Split a total into the amount due now and the remaining balance.
///
/// For `dp50` the half-way point on odd totals rounds up; the remaining
/// share is derived, so `amount_due + remaining == total` always holds.
pub fn compute_due(total: i64, plan: PaymentPlan) -> PaymentBreakdown {
    match plan {
        PaymentPlan::Full => PaymentBreakdown {
            amount_due: total,
            remaining: 0,
        },
        PaymentPlan::Dp50 => {
            let amount_due = total / 2 + total % 2;
            PaymentBreakdown {
                amount_due,
                remaining: total - amount_due,
            }
        }
    }
}
