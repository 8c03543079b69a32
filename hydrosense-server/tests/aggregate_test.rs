use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use hydrosense_api::AggregateRecord;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use hydrosense_server::repositories::AggregateStore;

mod common;
use common::mock_app::MockApp;

async fn trigger(app: &MockApp) -> (StatusCode, String, serde_json::Value) {
    let request = Request::builder()
        .uri("/aggregate")
        .method(Method::POST)
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let x_status = response.headers()["x-status"].to_str().unwrap().to_string();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, x_status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_trigger_without_data() {
    let app = MockApp::new().await;

    let (status, x_status, body) = trigger(&app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(x_status, "success");
    assert_eq!(
        body,
        json!({ "status": "success", "message": "No data in time range" })
    );

    let stored = app
        .aggregates
        .query_since("5min", OffsetDateTime::now_utc() - Duration::days(1))
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_trigger_aggregates_recent_readings() {
    let app = MockApp::new().await;
    let now = OffsetDateTime::now_utc();

    app.create_test_reading(20.0, 7.0, now - Duration::seconds(90)).await;
    app.create_test_reading(22.0, 7.2, now - Duration::seconds(60)).await;
    app.create_test_reading(24.0, 7.4, now - Duration::seconds(30)).await;
    // Older than one interval
    app.create_test_reading(50.0, 1.0, now - Duration::minutes(10)).await;

    let (status, x_status, body) = trigger(&app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(x_status, "success");
    assert_eq!(body["status"], json!("success"));

    let record: AggregateRecord = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(record.interval_label, "5min");
    assert_eq!(record.avg_temperature, 22.0);
    assert_eq!(record.min_temperature, 20.0);
    assert_eq!(record.max_temperature, 24.0);
    assert_eq!(record.avg_ph, 7.2);
    assert_eq!(record.sample_count, 3);

    let stored = app.aggregates.find(&record.key()).await.unwrap();
    assert_eq!(stored, Some(record));
}
