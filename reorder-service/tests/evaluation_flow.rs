use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt; // for collect()
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot
use uuid::Uuid;

use reorder_service::{build_router, AppState, ServiceConfig};

fn app() -> Router {
    build_router(AppState::from_config(&ServiceConfig::default()))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).method("GET").body(Body::empty()).unwrap()
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn snapshot_payload(critical_stock: f64) -> (Value, Uuid, Uuid, Uuid) {
    let (safe, warning, critical) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let payload = json!({
        "products": [
            { "id": safe, "name": "Raw Material B", "current_stock": 50.0, "min_stock": 10.0, "reorder_point": 20.0 },
            { "id": warning, "name": "Raw Material A", "current_stock": 15.0, "min_stock": 10.0, "reorder_point": 20.0, "predicted_demand": 120.0 },
            { "id": critical, "name": "Raw Material C", "current_stock": critical_stock, "min_stock": 10.0, "reorder_point": 100.0, "lead_time_days": 7 }
        ]
    });
    (payload, safe, warning, critical)
}

#[tokio::test]
async fn snapshot_evaluation_classifies_and_decides() {
    let app = app();
    let (payload, _safe, _warning, critical) = snapshot_payload(5.0);

    let resp = app.oneshot(post_json("/inventory", &payload)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let report = read_json(resp).await;

    let evaluated = report["evaluated"].as_array().unwrap();
    assert_eq!(evaluated.len(), 3);

    assert_eq!(evaluated[0]["status"], "safe");
    assert_eq!(evaluated[0]["decision"]["eligible"], json!(false));
    assert_eq!(evaluated[0]["decision"]["reason"], "NONE");

    assert_eq!(evaluated[1]["status"], "warning");
    assert_eq!(evaluated[1]["decision"]["eligible"], json!(true));
    assert_eq!(evaluated[1]["decision"]["reason"], "BELOW_REORDER_POINT");
    assert_eq!(evaluated[1]["decision"]["suggested_quantity"], json!(105.0));

    assert_eq!(evaluated[2]["status"], "critical");
    assert_eq!(evaluated[2]["decision"]["eligible"], json!(true));

    let alerts = report["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["product_id"], json!(critical));
    assert_eq!(alerts[0]["kind"], "low_stock");
    assert_eq!(alerts[0]["severity"], "critical");
    assert!(alerts[0]["message"].as_str().unwrap().contains("Low stock alert"));
}

#[tokio::test]
async fn reevaluation_does_not_duplicate_alerts() {
    let app = app();
    let (payload, _, _, _) = snapshot_payload(5.0);

    let first = read_json(app.clone().oneshot(post_json("/inventory", &payload)).await.unwrap()).await;
    let second = read_json(
        app.oneshot(
            Request::builder()
                .uri("/inventory/evaluate")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap(),
    )
    .await;

    assert_eq!(second["alerts_emitted"], json!(0));
    assert_eq!(
        first["alerts"][0]["id"].as_u64().unwrap(),
        second["alerts"][0]["id"].as_u64().unwrap()
    );
}

#[tokio::test]
async fn recovered_product_retires_its_alert() {
    let app = app();
    let (critical_payload, _, _, _) = snapshot_payload(5.0);
    let (recovered_payload, _, _, _) = snapshot_payload(500.0);

    app.clone().oneshot(post_json("/inventory", &critical_payload)).await.unwrap();
    let report = read_json(
        app.oneshot(post_json("/inventory", &recovered_payload)).await.unwrap(),
    )
    .await;

    assert!(report["alerts"].as_array().unwrap().is_empty());
    assert_eq!(report["alerts_retired"], json!(1));
}

#[tokio::test]
async fn dismissed_alert_only_returns_on_fresh_detection() {
    let app = app();
    let (critical_payload, _, _, _) = snapshot_payload(5.0);
    let (recovered_payload, _, _, _) = snapshot_payload(500.0);

    app.clone().oneshot(post_json("/inventory", &critical_payload)).await.unwrap();
    let alerts = read_json(app.clone().oneshot(get("/alerts")).await.unwrap()).await;
    let alert_id = alerts[0]["id"].as_u64().unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/alerts/{alert_id}"))
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Condition persists, alert stays suppressed.
    let report = read_json(
        app.clone().oneshot(post_json("/inventory", &critical_payload)).await.unwrap(),
    )
    .await;
    assert!(report["alerts"].as_array().unwrap().is_empty());

    // Condition clears, then re-occurs: a fresh alert with a fresh id.
    app.clone().oneshot(post_json("/inventory", &recovered_payload)).await.unwrap();
    let report = read_json(
        app.oneshot(post_json("/inventory", &critical_payload)).await.unwrap(),
    )
    .await;
    let alerts = report["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0]["id"].as_u64().unwrap() > alert_id);
}

#[tokio::test]
async fn in_window_shortage_upgrades_safe_product() {
    let app = app();
    let product_id = Uuid::new_v4();
    let stockout = (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339();
    let payload = json!({
        "products": [
            { "id": product_id, "name": "Raw Material B", "current_stock": 300.0, "min_stock": 50.0, "reorder_point": 250.0, "lead_time_days": 10 }
        ],
        "forecast": [
            { "product_id": product_id, "projected_stockout_date": stockout, "projected_shortage_quantity": 25.5 }
        ]
    });

    let report = read_json(app.oneshot(post_json("/inventory", &payload)).await.unwrap()).await;

    let decision = &report["evaluated"][0]["decision"];
    assert_eq!(report["evaluated"][0]["status"], "safe");
    assert_eq!(decision["eligible"], json!(true));
    assert_eq!(decision["reason"], "FORECAST_SHORTAGE");
    assert_eq!(decision["suggested_quantity"], json!(25.5));

    let alerts = report["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["kind"], "shortage_projection");
    assert_eq!(alerts[0]["projected_shortage_quantity"], json!(25.5));
}

#[tokio::test]
async fn get_inventory_serves_the_last_report() {
    let app = app();
    let (payload, _, _, _) = snapshot_payload(5.0);

    let empty = read_json(app.clone().oneshot(get("/inventory")).await.unwrap()).await;
    assert!(empty.as_array().unwrap().is_empty());

    app.clone().oneshot(post_json("/inventory", &payload)).await.unwrap();
    let evaluated = read_json(app.oneshot(get("/inventory")).await.unwrap()).await;
    assert_eq!(evaluated.as_array().unwrap().len(), 3);
}
