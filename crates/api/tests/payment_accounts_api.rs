//! Integration tests for payment account management and the storefront
//! account listing.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete, get, post_multipart, send_json};
use sqlx::PgPool;

async fn create_account(app: &axum::Router, body: serde_json::Value) -> serde_json::Value {
    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/admin/payment-accounts",
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bank_accounts_require_number_and_holder(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/admin/payment-accounts",
        serde_json::json!({ "method": "bank", "bank_name": "BCA" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let account = create_account(
        &app,
        serde_json::json!({
            "method": "bank",
            "bank_name": "BCA",
            "account_number": "1234567890",
            "account_name": "Toko Preorder",
        }),
    )
    .await;
    assert_eq!(account["method"], "bank");
    assert_eq!(account["is_active"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn storefront_lists_only_active_accounts_for_the_method(pool: PgPool) {
    let app = common::build_test_app(pool);

    create_account(
        &app,
        serde_json::json!({
            "method": "bank",
            "bank_name": "BCA",
            "account_number": "1234567890",
            "account_name": "Toko Preorder",
        }),
    )
    .await;
    create_account(&app, serde_json::json!({ "method": "qris", "bank_name": "QRIS" })).await;
    create_account(
        &app,
        serde_json::json!({
            "method": "bank",
            "bank_name": "Old BRI",
            "account_number": "999",
            "account_name": "Toko Preorder",
            "is_active": false,
        }),
    )
    .await;

    let response = get(app.clone(), "/api/v1/payment-accounts?method=bank").await;
    let json = body_json(response).await;
    let accounts = json["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["bank_name"], "BCA");

    // Without a method filter, every active account is offered.
    let response = get(app.clone(), "/api/v1/payment-accounts").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    // The admin still sees the inactive one.
    let response = get(app.clone(), "/api/v1/admin/payment-accounts").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_deactivate(pool: PgPool) {
    let app = common::build_test_app(pool);

    let account =
        create_account(&app, serde_json::json!({ "method": "qris", "bank_name": "QRIS" })).await;
    let id = account["id"].as_i64().unwrap();

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/payment-accounts/{id}"),
        serde_json::json!({ "bank_name": "QRIS (new)", "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["bank_name"], "QRIS (new)");
    assert_eq!(json["data"]["is_active"], false);

    let response = get(app.clone(), "/api/v1/payment-accounts").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn barcode_upload_attaches_a_path(pool: PgPool) {
    let app = common::build_test_app(pool);

    let account =
        create_account(&app, serde_json::json!({ "method": "qris", "bank_name": "QRIS" })).await;
    let id = account["id"].as_i64().unwrap();

    let response = post_multipart(
        app.clone(),
        &format!("/api/v1/admin/payment-accounts/{id}/barcode"),
        &[],
        Some(("file", "qr.png", "image/png", b"fake-qr-png".to_vec())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let path = json["data"]["barcode_path"].as_str().unwrap();
    assert!(path.starts_with("barcode_"));
    assert!(path.ends_with(".png"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_the_account(pool: PgPool) {
    let app = common::build_test_app(pool);

    let account =
        create_account(&app, serde_json::json!({ "method": "qris", "bank_name": "QRIS" })).await;
    let id = account["id"].as_i64().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/admin/payment-accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(app.clone(), &format!("/api/v1/admin/payment-accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
