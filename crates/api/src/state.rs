use std::sync::Arc;

use preorder_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: preorder_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object storage collaborator for proof/barcode/product images.
    pub storage: Arc<dyn ObjectStorage>,
}
