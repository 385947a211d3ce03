//! Shared helpers for integration tests.
//!
//! [`build_test_app`] mirrors the router construction in `main.rs` so the
//! tests exercise the same middleware stack (CORS, request ID, timeout,
//! tracing, panic recovery, body limit) that production uses. Object
//! storage is a throwaway local directory.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use preorder_api::config::{ServerConfig, StorageBackend, StorageConfig};
use preorder_api::router::build_app_router;
use preorder_api::state::AppState;
use preorder_storage::LocalObjectStorage;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        storage: StorageConfig {
            backend: StorageBackend::Local,
            local_root: "storage".to_string(),
            public_base_url: "http://localhost:3000/storage".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a throwaway storage directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let storage_root =
        std::env::temp_dir().join(format!("preorder-test-{}", uuid::Uuid::new_v4()));
    let storage = Arc::new(LocalObjectStorage::new(
        storage_root,
        config.storage.public_base_url.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a request with a JSON body.
pub async fn send_json(
    app: Router,
    method: Method,
    path: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// An uploaded file part: (field name, filename, content type, bytes).
pub type FilePart<'a> = (&'a str, &'a str, &'a str, Vec<u8>);

/// Hand-build a multipart/form-data body from text fields and an optional
/// file part. Returns the `Content-Type` header value and the body bytes.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> (String, Vec<u8>) {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((name, filename, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Send a multipart POST request.
pub async fn post_multipart(
    app: Router,
    path: &str,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> Response<Body> {
    let (content_type, body) = multipart_body(fields, file);
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Domain fixtures
// ---------------------------------------------------------------------------

/// Create a product via the admin API and activate it.
///
/// Returns the product ID. Defaults: price 150000, sizes S/M/L, stock 10.
pub async fn create_active_product(app: &Router, price: i64, stock_quantity: i32) -> i64 {
    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/admin/products",
        serde_json::json!({
            "name": "Oversized Hoodie Vol. 1",
            "description": "Limited pre-order run",
            "price": price,
            "available_sizes": ["S", "M", "L"],
            "stock_quantity": stock_quantity,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/products/{id}/status"),
        serde_json::json!({ "status": "active" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    id
}

/// Submit an order through the storefront endpoint with a small valid PNG
/// proof. Returns the raw response.
pub async fn submit_order(
    app: &Router,
    product_id: i64,
    size: &str,
    quantity: &str,
    payment_plan: &str,
) -> Response<Body> {
    let product_id = product_id.to_string();
    let fields = [
        ("customer_name", "Ayu Lestari"),
        ("customer_phone", "+62 812-0000-1111"),
        ("customer_address", "Jl. Melati No. 5, Bandung"),
        ("product_id", product_id.as_str()),
        ("size", size),
        ("quantity", quantity),
        ("payment_method", "bank"),
        ("payment_plan", payment_plan),
    ];
    post_multipart(
        app.clone(),
        "/api/v1/orders",
        &fields,
        Some(("proof", "transfer.png", "image/png", b"fake-png-bytes".to_vec())),
    )
    .await
}
