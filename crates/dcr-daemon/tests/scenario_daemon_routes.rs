//! In-process scenario tests for dcr-daemon HTTP endpoints.
//!
//! These tests build the Axum router without binding a TCP socket and drive
//! it via `tower::ServiceExt::oneshot`.
//!
//! # Invariants under test
//!
//! 1. `/v1/health` reports the service name and boot config hash.
//! 2. `/v1/revenue/split` returns the four shares; they sum to the amount.
//! 3. `/v1/revenue/report` reconciles and honors filter and sort.
//! 4. Invalid amounts answer 422 `INVALID_AMOUNT` locating the order.
//! 5. The state's policy (not a per-request one) drives every split.
//! 6. A filter with `from` after `to` answers 422 `INVALID_DATE_RANGE`.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use dcr_daemon::{routes, state};
use dcr_revenue::SplitPolicy;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_router() -> axum::Router {
    routes::build_router(Arc::new(state::AppState::default()))
}

async fn call(router: axum::Router, req: Request<axum::body::Body>) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, body)
}

async fn post_json(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = call(router, req).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn sample_orders() -> Value {
    json!([
        {"_id": "o1", "amount": 500, "doctorName": "Dr. A", "date": "2024-01-01"},
        {"_id": "o2", "amount": 300, "doctorName": "Dr. A", "date": "2024-01-02"},
        {"_id": "o3", "amount": 1000, "doctorName": "Dr. B", "brokerName": "Rahim", "date": "2024-01-02"},
        {"_id": "o4", "amount": 200, "agentName": "Karim", "date": "2024-01-03"},
        {"_id": "o5", "amount": 800, "date": "2024-01-03"}
    ])
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_200_ok_true() {
    let req = Request::builder()
        .method("GET")
        .uri("/v1/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, body) = call(make_router(), req).await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "dcr-daemon");
}

// ---------------------------------------------------------------------------
// POST /v1/revenue/split
// ---------------------------------------------------------------------------

#[tokio::test]
async fn split_doctor_and_broker() {
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/split",
        json!({"amount": 1000, "hasDoctor": true, "hasBroker": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["hospitalShare"], 900);
    assert_eq!(v["doctorShare"], 50);
    assert_eq!(v["brokerShare"], 50);
    assert_eq!(v["unallocatedShare"], 0);
}

#[tokio::test]
async fn split_accepts_has_agent_and_string_amount() {
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/split",
        json!({"amount": "1000", "hasAgent": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["hospitalShare"], 900);
    assert_eq!(v["brokerShare"], 50);
    assert_eq!(v["unallocatedShare"], 50);
}

#[tokio::test]
async fn split_uses_state_policy() {
    let policy = SplitPolicy {
        doctor_bps: 1000,
        broker_bps: 200,
        redirect_unused_doctor_share: true,
    };
    let router = routes::build_router(Arc::new(state::AppState::new(policy)));

    let (status, v) = post_json(
        router,
        "/v1/revenue/split",
        json!({"amount": 1000, "hasBroker": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["brokerShare"], 20);
    assert_eq!(v["hospitalShare"], 980);
    assert_eq!(v["unallocatedShare"], 0);
}

#[tokio::test]
async fn split_negative_amount_is_422() {
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/split",
        json!({"amount": -1, "hasDoctor": true}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["code"], "INVALID_AMOUNT");
    assert!(v.get("orderIndex").is_none());
}

#[tokio::test]
async fn split_garbage_amount_is_422() {
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/split",
        json!({"amount": "ten taka"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["code"], "INVALID_AMOUNT");
}

// ---------------------------------------------------------------------------
// POST /v1/revenue/report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn report_reconciles() {
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/report",
        json!({"orders": sample_orders()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["currency"], "BDT");
    assert_eq!(v["orderCount"], 5);
    assert_eq!(v["totalRevenue"], 2800);
    assert_eq!(v["hospitalRevenue"], 2600);
    assert_eq!(v["doctorRevenue"], 90);
    assert_eq!(v["brokerRevenue"], 60);
    assert_eq!(v["unallocatedRevenue"], 50);
    assert_eq!(v["brokerBreakdown"]["Karim"]["commission"], 10);
    assert_eq!(v["dailyBreakdown"]["2024-01-02"]["paidAmount"], 1300);
}

#[tokio::test]
async fn report_filter_by_doctor_and_dates() {
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/report",
        json!({
            "orders": sample_orders(),
            "filter": {"from": "2024-01-02", "to": "2024-01-03", "doctorName": "Dr. A"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["orderCount"], 1);
    assert_eq!(v["totalRevenue"], 300);
    assert_eq!(v["doctorBreakdown"]["Dr. A"]["commission"], 15);
}

#[tokio::test]
async fn report_reversed_date_range_is_422() {
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/report",
        json!({
            "orders": sample_orders(),
            "filter": {"from": "2024-01-03", "to": "2024-01-01"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["code"], "INVALID_DATE_RANGE");
    assert!(v.get("orderIndex").is_none());
}

#[tokio::test]
async fn report_sort_revenue_desc() {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/revenue/report")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            json!({"orders": sample_orders(), "sort": "revenue_desc"}).to_string(),
        ))
        .unwrap();
    let (status, bytes) = call(make_router(), req).await;
    assert_eq!(status, StatusCode::OK);

    // Key order is only visible in the raw body.
    let text = std::str::from_utf8(&bytes).unwrap();
    let b = text.find("\"Dr. B\"").unwrap();
    let a = text.find("\"Dr. A\"").unwrap();
    assert!(b < a);
}

#[tokio::test]
async fn report_invalid_amount_is_422_with_location() {
    let orders = json!([
        {"_id": "ok", "amount": 100, "date": "2024-01-01"},
        {"_id": "INV-0042", "amount": "1,000", "date": "2024-01-01"}
    ]);
    let (status, v) = post_json(make_router(), "/v1/revenue/report", json!({"orders": orders})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["code"], "INVALID_AMOUNT");
    assert_eq!(v["orderIndex"], 1);
    assert_eq!(v["orderId"], "INV-0042");
}

#[tokio::test]
async fn report_rejects_invalid_order_outside_filter() {
    let orders = json!([
        {"_id": "ok", "amount": 100, "date": "2024-01-01"},
        {"_id": "neg", "amount": -5, "date": "2024-06-01"}
    ]);
    let (status, v) = post_json(
        make_router(),
        "/v1/revenue/report",
        json!({"orders": orders, "filter": {"to": "2024-01-31"}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["orderIndex"], 1);
    assert_eq!(v["orderId"], "neg");
}

#[tokio::test]
async fn report_empty_orders_is_zero_report() {
    let (status, v) = post_json(make_router(), "/v1/revenue/report", json!({"orders": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["orderCount"], 0);
    assert_eq!(v["totalRevenue"], 0);
    assert!(v["dailyBreakdown"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_rejected_by_extractor() {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/revenue/report")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, _) = call(make_router(), req).await;
    assert!(status.is_client_error());
}
