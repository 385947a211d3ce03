//! Order lifecycle statuses and the transition rules between them.
//!
//! One canonical status set is shared by every component that touches an
//! order. Unknown values are rejected at the boundary instead of being
//! passed through as strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of an order.
///
/// Orders move linearly `pending -> confirmed -> processing -> shipped ->
/// completed`. `cancelled` is reachable from any non-terminal status.
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

/// All recognized statuses, in lifecycle order.
pub const ALL_STATUSES: &[OrderStatus] = &[
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

impl OrderStatus {
    /// The wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Position in the linear lifecycle. `Cancelled` sits outside it.
    fn rank(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Completed => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `self -> next` is a legal transition.
    ///
    /// Legal moves are exactly one step forward in the linear lifecycle, or
    /// a jump to `Cancelled` from any non-terminal status. Skipping ahead
    /// (e.g. `pending -> completed`) and self-transitions are illegal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            OrderStatus::Cancelled => true,
            _ => match (self.rank(), next.rank()) {
                (Some(from), Some(to)) => to == from + 1,
                _ => false,
            },
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown order status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validate that `from -> to` is legal before persisting a transition.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::IllegalTransition { from, to })
    }
}
