//! Route definitions for the `/payment-accounts` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::payment_accounts;
use crate::state::AppState;

/// Storefront routes mounted at `/payment-accounts`.
///
/// ```text
/// GET    /                -> list_active (?method= filter)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(payment_accounts::list_active))
}

/// Admin routes mounted at `/admin/payment-accounts`.
///
/// ```text
/// GET    /                -> list_all
/// POST   /                -> create
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// POST   /{id}/barcode    -> upload_barcode (multipart)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(payment_accounts::list_all).post(payment_accounts::create),
        )
        .route(
            "/{id}",
            put(payment_accounts::update).delete(payment_accounts::delete),
        )
        .route("/{id}/barcode", post(payment_accounts::upload_barcode))
}
