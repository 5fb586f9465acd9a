//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use harbour_cache::cache::{CacheConfig, ExpiringCache, ManualClock};
use harbour_cache::store::{KeyValueStore, MemoryStore};
use harbour_cache::{api::create_router, AppState};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
}

fn create_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let cache = ExpiringCache::with_clock(store.clone(), CacheConfig::default(), clock.clone());
    TestApp {
        router: create_router(AppState::new(cache)),
        store,
        clock,
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get() {
    let app = create_test_app();

    let (status, json) = send(
        &app.router,
        "PUT",
        "/cache/rates",
        Some(r#"{"value":[{"name":"Sardine","price":141}]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("rates"));

    let (status, json) = send(&app.router, "GET", "/cache/rates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "rates");
    assert_eq!(json["value"][0]["name"], "Sardine");
    assert_eq!(json["value"][0]["price"], 141);
    assert_eq!(
        json["expiresAt"].as_u64().unwrap() - json["timestamp"].as_u64().unwrap(),
        24 * 60 * 60 * 1000
    );
}

#[tokio::test]
async fn test_get_unknown_key_is_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/cache/unknown_key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("unknown_key"));
}

#[tokio::test]
async fn test_get_after_expiry_is_not_found_and_reaped() {
    let app = create_test_app();
    send(&app.router, "PUT", "/cache/rates", Some(r#"{"value":1}"#)).await;

    app.clock.advance(Duration::from_secs(25 * 60 * 60));

    let (status, _) = send(&app.router, "GET", "/cache/rates", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!app.store.contains_key("@harbour_cache:rates").await);
}

#[tokio::test]
async fn test_set_rejects_malformed_body() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache/rates")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"no_value": true}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == DELETE ==

#[tokio::test]
async fn test_delete_single_key() {
    let app = create_test_app();
    send(&app.router, "PUT", "/cache/harbours", Some(r#"{"value":["Kochi"]}"#)).await;
    send(&app.router, "PUT", "/cache/species", Some(r#"{"value":["Tuna"]}"#)).await;

    let (status, _) = send(&app.router, "DELETE", "/cache/harbours", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app.router, "DELETE", "/cache/harbours", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, "GET", "/cache/harbours", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, json) = send(&app.router, "GET", "/cache/species", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"][0], "Tuna");
}

#[tokio::test]
async fn test_clear_all_keeps_foreign_keys() {
    let app = create_test_app();
    app.store
        .set_item("supabase.auth.token", "session".to_string())
        .await
        .unwrap();
    send(&app.router, "PUT", "/cache/rates", Some(r#"{"value":1}"#)).await;
    send(&app.router, "PUT", "/cache/species", Some(r#"{"value":2}"#)).await;

    let (status, _) = send(&app.router, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app.router, "GET", "/cache", None).await;
    assert_eq!(json["keys"], serde_json::json!([]));
    assert!(app.store.contains_key("supabase.auth.token").await);
}

// == LIST / PURGE ==

#[tokio::test]
async fn test_list_and_purge() {
    let app = create_test_app();
    send(&app.router, "PUT", "/cache/rates", Some(r#"{"value":1}"#)).await;
    app.clock.advance(Duration::from_secs(20 * 60 * 60));
    send(&app.router, "PUT", "/cache/species", Some(r#"{"value":2}"#)).await;
    app.clock.advance(Duration::from_secs(5 * 60 * 60));

    let (_, json) = send(&app.router, "GET", "/cache", None).await;
    assert_eq!(json["keys"], serde_json::json!(["rates", "species"]));

    let (status, json) = send(&app.router, "POST", "/cache/purge", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);

    let (_, json) = send(&app.router, "GET", "/cache", None).await;
    assert_eq!(json["keys"], serde_json::json!(["species"]));
}

// == STATS / HEALTH ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();
    send(&app.router, "PUT", "/cache/stats_key", Some(r#"{"value":"v"}"#)).await;
    send(&app.router, "GET", "/cache/stats_key", None).await;
    send(&app.router, "GET", "/cache/nonexistent", None).await;

    let (status, json) = send(&app.router, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
