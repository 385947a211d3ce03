//! Route definitions for the public `/track` lookup.

use axum::routing::get;
use axum::Router;

use crate::handlers::tracking;
use crate::state::AppState;

/// Routes mounted at `/track`.
///
/// ```text
/// GET    /{code}          -> lookup (public, unauthenticated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{code}", get(tracking::lookup))
}
