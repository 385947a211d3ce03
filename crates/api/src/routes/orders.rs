//! Route definitions for the `/orders` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Storefront routes mounted at `/orders`.
///
/// ```text
/// POST   /                -> submit_order (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(orders::submit_order))
}

/// Admin routes mounted at `/admin/orders`.
///
/// ```text
/// GET    /                -> list_orders
/// GET    /{id}            -> get_order (with audit trail)
/// PUT    /{id}/status     -> update_status
/// PUT    /{id}/payment    -> update_payment
/// DELETE /{id}            -> delete_order
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders))
        .route("/{id}", get(orders::get_order).delete(orders::delete_order))
        .route("/{id}/status", put(orders::update_status))
        .route("/{id}/payment", put(orders::update_payment))
}
