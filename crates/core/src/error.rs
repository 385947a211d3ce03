use crate::status::OrderStatus;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid order input: {0}")]
    InvalidOrderInput(String),

    #[error("No payment proof was provided")]
    ProofMissing,

    #[error("Payment proof must be an image, got '{0}'")]
    ProofWrongType(String),

    #[error("Payment proof is {size} bytes; the limit is {max} bytes")]
    ProofTooLarge { size: u64, max: u64 },

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Insufficient stock: requested {requested}, available {available}")]
    OutOfStock { requested: i32, available: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
