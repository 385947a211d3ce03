//! Integration tests for order submission, the stock reservation, the
//! status state machine, payment updates, and the audit trail.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_active_product, delete, get, send_json, submit_order};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_creates_pending_order_with_frozen_totals(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "2", "full").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let order = &json["data"];

    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_price"], 300_000);
    assert_eq!(order["payment_amount"], 300_000);
    assert_eq!(order["remaining_amount"], 0);
    assert_eq!(order["size"], "M");
    assert_eq!(order["quantity"], 2);
    assert_eq!(order["short_code"].as_str().unwrap().len(), 4);
    assert!(order["payment_proof"]
        .as_str()
        .unwrap()
        .starts_with("proof_"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dp50_submission_splits_the_total_in_half(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "2", "dp50").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let order = &json["data"];

    assert_eq!(order["total_price"], 300_000);
    assert_eq!(order["payment_amount"], 150_000);
    assert_eq!(order["remaining_amount"], 150_000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fresh_order_has_exactly_one_pending_event(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "S", "1", "full").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get(app.clone(), &format!("/api/v1/admin/orders/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let events = json["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_decrements_available_stock(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = get(app.clone(), &format!("/api/v1/products/{product_id}")).await;
    assert_eq!(body_json(response).await["data"]["available_stock"], 10);

    submit_order(&app, product_id, "M", "2", "full").await;

    let response = get(app.clone(), &format!("/api/v1/products/{product_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["available_stock"], 8);
    assert_eq!(json["data"]["committed_quantity"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversell_is_rejected_server_side(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    // Prior orders of 2 + 3 + 1 leave 4 available.
    for quantity in ["2", "3", "1"] {
        let response = submit_order(&app, product_id, "M", quantity, "full").await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // A fourth order of 5 would drive availability negative.
    let response = submit_order(&app, product_id, "M", "5", "full").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "OUT_OF_STOCK");

    // Availability is unchanged and an order of the remaining 4 still fits.
    let response = submit_order(&app, product_id, "M", "4", "full").await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn draft_product_is_not_orderable(pool: PgPool) {
    let app = common::build_test_app(pool);

    // Created but never activated.
    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/admin/products",
        serde_json::json!({
            "name": "Unreleased drop",
            "price": 100_000,
            "available_sizes": ["M"],
            "stock_quantity": 5,
        }),
    )
    .await;
    let product_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = submit_order(&app, product_id, "M", "1", "full").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Submission validation (nothing persisted on failure)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn proof_with_wrong_type_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;
    let product_id_str = product_id.to_string();

    let fields = [
        ("customer_name", "Ayu Lestari"),
        ("customer_phone", "+62 812-0000-1111"),
        ("customer_address", "Jl. Melati No. 5, Bandung"),
        ("product_id", product_id_str.as_str()),
        ("size", "M"),
        ("quantity", "1"),
        ("payment_method", "bank"),
        ("payment_plan", "full"),
    ];
    let response = common::post_multipart(
        app.clone(),
        "/api/v1/orders",
        &fields,
        Some(("proof", "doc.pdf", "application/pdf", b"%PDF-1.4".to_vec())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "PROOF_WRONG_TYPE");

    // No partial order was created.
    let response = get(app.clone(), "/api/v1/admin/orders").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn proof_over_5_mib_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;
    let product_id_str = product_id.to_string();

    let fields = [
        ("customer_name", "Ayu Lestari"),
        ("customer_phone", "+62 812-0000-1111"),
        ("customer_address", "Jl. Melati No. 5, Bandung"),
        ("product_id", product_id_str.as_str()),
        ("size", "M"),
        ("quantity", "1"),
        ("payment_method", "bank"),
        ("payment_plan", "full"),
    ];
    let six_mib = vec![0u8; 6 * 1024 * 1024];
    let response = common::post_multipart(
        app.clone(),
        "/api/v1/orders",
        &fields,
        Some(("proof", "big.png", "image/png", six_mib)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["code"], "PROOF_TOO_LARGE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_proof_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;
    let product_id_str = product_id.to_string();

    let fields = [
        ("customer_name", "Ayu Lestari"),
        ("customer_phone", "+62 812-0000-1111"),
        ("customer_address", "Jl. Melati No. 5, Bandung"),
        ("product_id", product_id_str.as_str()),
        ("size", "M"),
        ("quantity", "1"),
        ("payment_method", "bank"),
        ("payment_plan", "full"),
    ];
    let response = common::post_multipart(app.clone(), "/api/v1/orders", &fields, None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "PROOF_MISSING");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quantity_outside_bounds_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "0", "full").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = submit_order(&app, product_id, "M", "11", "full").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn size_not_offered_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    // Fixture product only offers S/M/L.
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "XXL", "1", "full").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_payment_plan_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "1", "installments").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// State machine and audit trail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn transitions_append_events_in_lifecycle_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "1", "full").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    for status in ["confirmed", "processing", "shipped", "completed"] {
        let response = send_json(
            app.clone(),
            Method::PUT,
            &format!("/api/v1/admin/orders/{order_id}/status"),
            serde_json::json!({ "status": status, "note": format!("now {status}") }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "transition to {status}");
    }

    let response = get(app.clone(), &format!("/api/v1/admin/orders/{order_id}")).await;
    let json = body_json(response).await;

    assert_eq!(json["data"]["order"]["status"], "completed");

    // N transitions -> N + 1 events, ascending, statuses matching.
    let events = json["data"]["events"].as_array().unwrap();
    let statuses: Vec<&str> = events.iter().map(|e| e["status"].as_str().unwrap()).collect();
    assert_eq!(
        statuses,
        ["pending", "confirmed", "processing", "shipped", "completed"]
    );

    let ids: Vec<i64> = events.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted, "events must be ascending by occurrence");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn illegal_jump_is_rejected_and_leaves_no_event(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "1", "full").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/orders/{order_id}/status"),
        serde_json::json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "ILLEGAL_TRANSITION");

    // The failed transition must not have touched the trail.
    let response = get(app.clone(), &format!("/api/v1/admin/orders/{order_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["order"]["status"], "pending");
    assert_eq!(json["data"]["events"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancellation_is_terminal(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "1", "full").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/orders/{order_id}/status"),
        serde_json::json!({ "status": "cancelled", "note": "customer request" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/orders/{order_id}/status"),
        serde_json::json!({ "status": "confirmed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelled_order_still_counts_against_stock(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "4", "full").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/orders/{order_id}/status"),
        serde_json::json!({ "status": "cancelled" }),
    )
    .await;

    // The ledger is intentionally conservative: committed quantity counts
    // orders in every status.
    let response = get(app.clone(), &format!("/api/v1/products/{product_id}")).await;
    assert_eq!(body_json(response).await["data"]["available_stock"], 6);
}

// ---------------------------------------------------------------------------
// Payment updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn switching_to_full_plan_confirms_a_pending_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "2", "dp50").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/orders/{order_id}/payment"),
        serde_json::json!({
            "payment_plan": "full",
            "payment_method": "bank",
            "payment_amount": 300_000,
            "note": "settled in person",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "confirmed");
    assert_eq!(json["data"]["payment_amount"], 300_000);
    assert_eq!(json["data"]["remaining_amount"], 0);

    // The change is described in the appended event's note.
    let response = get(app.clone(), &format!("/api/v1/admin/orders/{order_id}")).await;
    let json = body_json(response).await;
    let events = json["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["status"], "confirmed");
    let note = events[1]["note"].as_str().unwrap();
    assert!(note.contains("Payment updated"), "note was: {note}");
    assert!(note.contains("settled in person"), "note was: {note}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_plan_with_partial_amount_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "2", "dp50").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/orders/{order_id}/payment"),
        serde_json::json!({
            "payment_plan": "full",
            "payment_method": "bank",
            "payment_amount": 100_000,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Admin delete override
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_purges_the_order_and_its_trail(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "1", "full").await;
    let order_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = delete(app.clone(), &format!("/api/v1/admin/orders/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/api/v1/admin/orders/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Admin listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let product_id = create_active_product(&app, 150_000, 10).await;

    let response = submit_order(&app, product_id, "M", "1", "full").await;
    let first_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    submit_order(&app, product_id, "M", "1", "full").await;

    send_json(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/admin/orders/{first_id}/status"),
        serde_json::json!({ "status": "confirmed" }),
    )
    .await;

    let response = get(app.clone(), "/api/v1/admin/orders?status=pending").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get(app.clone(), "/api/v1/admin/orders?status=confirmed").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"].as_str().unwrap(), first_id);
}
