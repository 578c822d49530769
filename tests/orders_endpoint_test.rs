use axum::http::StatusCode;
use bondbook::api::{self, AppState};
use bondbook::db::init_db;
use bondbook::domain::InventoryMethod;
use bondbook::marketdata::MockQuoteSource;
use bondbook::{Config, QuoteSource, Repository};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    _temp: TempDir,
}

fn test_config() -> Config {
    Config {
        port: 0,
        database_path: ":memory:".to_string(),
        market_data_url: "http://example.invalid".to_string(),
        inventory_method: InventoryMethod::Fifo,
    }
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");

    let repo = Arc::new(Repository::new(pool));
    let quotes: Arc<dyn QuoteSource> = Arc::new(MockQuoteSource::new());
    let state = AppState::new(repo, test_config(), quotes);
    let app = api::create_router(state);

    TestApp {
        app,
        _temp: temp_dir,
    }
}

async fn request_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn order_body(ticker: &str, side: &str, qty: f64, px: f64) -> Value {
    json!({
        "ticker": ticker,
        "side": side,
        "quantity": qty,
        "price": px,
    })
}

#[tokio::test]
async fn test_health_and_ready() {
    let test_app = setup_test_app().await;

    let (status, body) = request_json(test_app.app.clone(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = request_json(test_app.app.clone(), "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_submit_order_returns_created() {
    let test_app = setup_test_app().await;

    let (status, body) = request_json(
        test_app.app.clone(),
        "POST",
        "/v1/orders",
        Some(order_body("acme", "buy", 100.0, 99.875)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    assert_eq!(body["order"]["ticker"], "ACME");
    assert_eq!(body["order"]["side"], "buy");
    assert_eq!(body["order"]["quantity"], "100");
    assert_eq!(body["order"]["price"], "99.875");
    assert_eq!(body["order"]["status"], "filled");
    assert!(body["order"]["id"].is_string());
}

#[tokio::test]
async fn test_submit_order_is_idempotent_on_id() {
    let test_app = setup_test_app().await;
    let id = "6f9619ff-8b86-4d01-b42d-00cf4fc964ff";

    let mut body = order_body("ACME", "buy", 100.0, 10.0);
    body["id"] = json!(id);

    let (status, first) =
        request_json(test_app.app.clone(), "POST", "/v1/orders", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["created"], true);

    // Replay with a different price: the stored row wins.
    body["price"] = json!(999.0);
    let (status, second) =
        request_json(test_app.app.clone(), "POST", "/v1/orders", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);

    let (_, listed) = request_json(test_app.app.clone(), "GET", "/v1/orders", None).await;
    assert_eq!(listed["orders"].as_array().unwrap().len(), 1);
    assert_eq!(listed["orders"][0]["price"], "10");
}

#[tokio::test]
async fn test_submit_order_rejects_bad_input() {
    let test_app = setup_test_app().await;

    let (status, body) = request_json(
        test_app.app.clone(),
        "POST",
        "/v1/orders",
        Some(order_body("ACME", "buy", 0.0, 10.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = request_json(
        test_app.app.clone(),
        "POST",
        "/v1/orders",
        Some(order_body("ACME", "sell", 100.0, -5.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request_json(
        test_app.app.clone(),
        "POST",
        "/v1/orders",
        Some(order_body("   ", "buy", 100.0, 10.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_orders_filters_and_counts() {
    let test_app = setup_test_app().await;

    for (ticker, side, qty, px, status) in [
        ("ACME", "buy", 100.0, 10.0, "filled"),
        ("ACME", "sell", 40.0, 12.0, "filled"),
        ("GLOBO", "buy", 50.0, 20.0, "pending"),
    ] {
        let mut body = order_body(ticker, side, qty, px);
        body["status"] = json!(status);
        let (code, _) =
            request_json(test_app.app.clone(), "POST", "/v1/orders", Some(body)).await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, body) = request_json(test_app.app.clone(), "GET", "/v1/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 3);
    assert_eq!(body["counts"]["filled"], 2);
    assert_eq!(body["counts"]["pending"], 1);
    assert_eq!(body["counts"]["cancelled"], 0);
    // 100*10 + 40*12 + 50*20 = 2480 across non-cancelled orders.
    assert_eq!(body["totalValue"], "2480");

    let (status, body) = request_json(
        test_app.app.clone(),
        "GET",
        "/v1/orders?ticker=acme&status=filled",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);

    let (status, _) = request_json(
        test_app.app.clone(),
        "GET",
        "/v1/orders?status=bogus",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_order_lifecycle() {
    let test_app = setup_test_app().await;

    let mut body = order_body("ACME", "buy", 100.0, 10.0);
    body["status"] = json!("pending");
    let (_, created) =
        request_json(test_app.app.clone(), "POST", "/v1/orders", Some(body)).await;
    let id = created["order"]["id"].as_str().unwrap().to_string();

    let (status, cancelled) = request_json(
        test_app.app.clone(),
        "POST",
        &format!("/v1/orders/{id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    // A cancelled order cannot be cancelled again.
    let (status, body) = request_json(
        test_app.app.clone(),
        "POST",
        &format!("/v1/orders/{id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, _) = request_json(
        test_app.app.clone(),
        "POST",
        "/v1/orders/6f9619ff-8b86-4d01-b42d-00cf4fc964ff/cancel",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_amend_order_rules() {
    let test_app = setup_test_app().await;

    let mut pending = order_body("ACME", "buy", 100.0, 10.0);
    pending["status"] = json!("pending");
    let (_, created) =
        request_json(test_app.app.clone(), "POST", "/v1/orders", Some(pending)).await;
    let pending_id = created["order"]["id"].as_str().unwrap().to_string();

    let (status, amended) = request_json(
        test_app.app.clone(),
        "PUT",
        &format!("/v1/orders/{pending_id}"),
        Some(json!({"quantity": 150.0, "price": 10.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amended["quantity"], "150");
    assert_eq!(amended["price"], "10.5");
    assert_eq!(amended["status"], "pending");

    let (status, _) = request_json(
        test_app.app.clone(),
        "PUT",
        &format!("/v1/orders/{pending_id}"),
        Some(json!({"quantity": -1.0, "price": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Filled orders are immutable.
    let (_, filled) = request_json(
        test_app.app.clone(),
        "POST",
        "/v1/orders",
        Some(order_body("GLOBO", "buy", 10.0, 5.0)),
    )
    .await;
    let filled_id = filled["order"]["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        test_app.app.clone(),
        "PUT",
        &format!("/v1/orders/{filled_id}"),
        Some(json!({"quantity": 20.0, "price": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_listing_is_deterministic() {
    let test_app = setup_test_app().await;

    for i in 0..3 {
        let body = order_body("ACME", "buy", 10.0 + f64::from(i), 10.0);
        request_json(test_app.app.clone(), "POST", "/v1/orders", Some(body)).await;
    }

    let (_, first) = request_json(test_app.app.clone(), "GET", "/v1/orders", None).await;
    let (_, second) = request_json(test_app.app.clone(), "GET", "/v1/orders", None).await;
    assert_eq!(first, second);
}
