// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening a socket for it.
// We exercise the router directly via tower::ServiceExt::oneshot; article
// URLs point at the local fixture site.

mod common;

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode},
};
use common::*;
use jaundice_rate::api::{self, AppState};
use jaundice_rate::config::DEFAULT_MAX_URLS;
use serde_json::{Value as Json, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt as _; // for `oneshot`

const BODY_LIMIT: usize = 1024 * 1024;

fn test_router() -> Router {
    api::router(AppState {
        ctx: context(),
        timeouts: timeouts(Duration::from_secs(3)),
        max_urls: DEFAULT_MAX_URLS,
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let value: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

fn query(urls: &[String]) -> String {
    format!("/?urls={}", urlencoding::encode(&urls.join(",")))
}

#[tokio::test]
async fn missing_urls_is_400() {
    let (status, body) = get(test_router(), "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "no urls given"}));
}

#[tokio::test]
async fn empty_urls_is_400() {
    let (status, body) = get(test_router(), "/?urls=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "no urls given"}));
}

#[tokio::test]
async fn more_than_ten_urls_is_400() {
    let urls: Vec<String> = (0..11).map(|i| format!("https://inosmi.ru/{i}.html")).collect();
    let (status, body) = get(test_router(), &query(&urls)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "too many urls in request, should be 10 or less"})
    );
}

#[tokio::test]
async fn limit_follows_configuration() {
    let app = api::router(AppState {
        ctx: context(),
        timeouts: timeouts(Duration::from_secs(3)),
        max_urls: 2,
    });
    let urls: Vec<String> = (0..3).map(|i| format!("https://inosmi.ru/{i}.html")).collect();
    let (status, body) = get(app, &query(&urls)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "too many urls in request, should be 2 or less"})
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn results_are_returned_in_request_order() {
    let site = spawn_site().await;
    let urls = vec![site.url("/plain"), site.url("/article"), site.url("/missing")];
    // Trailing comma is ignored.
    let uri = format!("{},", query(&urls));

    let (status, body) = get(test_router(), &uri).await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[0],
        json!({"status": "PARSING_ERROR", "url": urls[0], "score": null, "words_count": null})
    );
    assert_eq!(
        items[1],
        json!({"status": "OK", "url": urls[1], "score": 21.74, "words_count": 23})
    );
    assert_eq!(
        items[2],
        json!({"status": "FETCH_ERROR", "url": urls[2], "score": null, "words_count": null})
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn batch_fault_is_500() {
    let site = spawn_site().await;
    let mut registry = fixture_registry();
    registry.register("127_0_0_1", BrokenSanitizer);
    let app = api::router(AppState {
        ctx: context_with(Arc::new(russian_morph()), registry),
        timeouts: timeouts(Duration::from_secs(3)),
        max_urls: DEFAULT_MAX_URLS,
    });

    let (status, body) = get(app, &query(&[site.url("/article")])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "internal error"}));
}
