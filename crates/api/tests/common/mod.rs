#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use listings_api::app::build_app;
use listings_api::config::ServerConfig;
use listings_api::state::AppState;
use listings_core::listing_search::SearchMode;
use listings_db::InMemoryApartmentStore;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:3001")],
        request_timeout_secs: 30,
        database_url: None,
        db_max_connections: 1,
        search_mode: SearchMode::Combined,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The returned router is cheap to clone; clones share the same store.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState {
        store: Arc::new(InMemoryApartmentStore::new()),
        config: Arc::new(config),
    };
    build_app(state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid create payload; override fields with `payload[...] = ...`.
pub fn apartment_payload(unit_name: &str, project: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "unitName": unit_name,
        "unitNumber": "A101",
        "project": project,
        "description": "Bright corner unit",
        "price": price,
        "bedrooms": 2,
        "bathrooms": 2,
        "area": 110.5,
        "propertyType": "Apartment",
        "amenities": ["Gym", "Swimming Pool"],
        "featured": false,
        "images": [],
        "location": {
            "latitude": 25.2,
            "longitude": 55.27,
            "address": "1 Main Street, Downtown"
        }
    })
}

/// Create an apartment and return its JSON representation.
pub async fn create(app: &Router, payload: serde_json::Value) -> serde_json::Value {
    let response = post_json(app.clone(), "/apartments", payload).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Unit names of a JSON array of apartments, in response order.
pub fn unit_names(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|a| a["unitName"].as_str().unwrap_or_default().to_string())
        .collect()
}
