//! Public order tracking by short code.
//!
//! Deliberately unauthenticated: the code is the last four characters of
//! the order identifier, a low-friction lookup rather than a secret.

use axum::extract::{Path, State};
use axum::Json;
use preorder_core::tracking;
use preorder_db::models::order::Order;
use preorder_db::models::order_event::OrderEvent;
use preorder_db::repositories::{OrderEventRepo, OrderRepo, ProductRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// One tracked order: its snapshot, the product name, and the full audit
/// trail ascending by time.
#[derive(Debug, Serialize)]
pub struct TrackingMatch {
    pub order: Order,
    pub product_name: Option<String>,
    pub events: Vec<OrderEvent>,
}

/// GET /api/v1/track/{code}
///
/// Resolve a user-typed tracking code. The code is normalized (strip
/// non-alphanumerics, keep the last four characters) and matched against
/// the indexed short-code column. Every match is returned; zero matches is
/// an empty list with 200, never an error.
pub async fn lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<Vec<TrackingMatch>>>> {
    let Some(short_code) = tracking::normalize_lookup_code(&code) else {
        return Ok(Json(DataResponse { data: Vec::new() }));
    };

    let orders = OrderRepo::find_by_short_code(&state.pool, &short_code).await?;

    let mut matches = Vec::with_capacity(orders.len());
    for order in orders {
        let product_name = ProductRepo::find_by_id(&state.pool, order.product_id)
            .await?
            .map(|p| p.name);
        let events = OrderEventRepo::list_by_order(&state.pool, order.id).await?;
        matches.push(TrackingMatch {
            order,
            product_name,
            events,
        });
    }

    tracing::debug!(code = %short_code, matches = matches.len(), "Tracking lookup");
    Ok(Json(DataResponse { data: matches }))
}
