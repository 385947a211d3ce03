pub mod health;
pub mod orders;
pub mod payment_accounts;
pub mod products;
pub mod tracking;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /products                                  storefront listing (active only)
/// /products/{id}                             one active product with stock
/// /payment-accounts                          active accounts, ?method= filter
/// /orders                                    submit pre-order (multipart)
/// /track/{code}                              public tracking lookup
///
/// /admin/products                            list, create
/// /admin/products/{id}                       get, update, delete
/// /admin/products/{id}/status                lifecycle transition (PUT)
/// /admin/products/{id}/images                image upload (POST, multipart)
///
/// /admin/orders                              list (status filter, paging)
/// /admin/orders/{id}                         get with audit trail, delete
/// /admin/orders/{id}/status                  status transition (PUT)
/// /admin/orders/{id}/payment                 payment update (PUT)
///
/// /admin/payment-accounts                    list, create
/// /admin/payment-accounts/{id}               update, delete
/// /admin/payment-accounts/{id}/barcode       barcode upload (POST, multipart)
/// ```
///
/// Authentication is delegated to an external provider; its middleware
/// wraps the `/admin` subtree when mounted.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/track", tracking::router())
        .nest("/payment-accounts", payment_accounts::router())
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", products::admin_router())
        .nest("/orders", orders::admin_router())
        .nest("/payment-accounts", payment_accounts::admin_router())
}
