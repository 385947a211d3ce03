//! Route definitions for the `/products` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Storefront routes mounted at `/products`.
///
/// ```text
/// GET    /                -> list_active (with stock snapshot)
/// GET    /{id}            -> get_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_active))
        .route("/{id}", get(products::get_active))
}

/// Admin routes mounted at `/admin/products`.
///
/// ```text
/// GET    /                -> list_all
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// PUT    /{id}/status     -> set_status
/// POST   /{id}/images     -> upload_image (multipart)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_all).post(products::create))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/{id}/status", put(products::set_status))
        .route("/{id}/images", post(products::upload_image))
}
