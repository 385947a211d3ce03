use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use preorder_core::error::CoreError;
use preorder_db::repositories::OrderWriteError;
use preorder_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `preorder_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An object storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<OrderWriteError> for AppError {
    fn from(err: OrderWriteError) -> Self {
        match err {
            OrderWriteError::OrderNotFound(id) => AppError::Core(CoreError::NotFound {
                entity: "Order",
                id: id.to_string(),
            }),
            OrderWriteError::ProductNotFound(id) => AppError::Core(CoreError::NotFound {
                entity: "Product",
                id: id.to_string(),
            }),
            OrderWriteError::ProductNotActive => AppError::Core(CoreError::Conflict(
                "Product is not open for orders".to_string(),
            )),
            OrderWriteError::Domain(core) => AppError::Core(core),
            OrderWriteError::Db(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::InvalidOrderInput(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::ProofMissing => (
                    StatusCode::BAD_REQUEST,
                    "PROOF_MISSING",
                    core.to_string(),
                ),
                CoreError::ProofWrongType(_) => (
                    StatusCode::BAD_REQUEST,
                    "PROOF_WRONG_TYPE",
                    core.to_string(),
                ),
                CoreError::ProofTooLarge { .. } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PROOF_TOO_LARGE",
                    core.to_string(),
                ),
                CoreError::IllegalTransition { .. } => (
                    StatusCode::CONFLICT,
                    "ILLEGAL_TRANSITION",
                    core.to_string(),
                ),
                CoreError::OutOfStock { .. } => {
                    (StatusCode::CONFLICT, "OUT_OF_STOCK", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Object storage errors ---
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage upload failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORAGE_UPLOAD_FAILED",
                    "Uploading the file failed, please try again".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign-key violations map to 409 (the referenced rows still exist).
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            // PostgreSQL foreign key violation: error code 23503
            if db_err.code().as_deref() == Some("23503") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "The record is still referenced by other rows".to_string(),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
