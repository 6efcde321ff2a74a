//! Helpers for driving the router in-process.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use noteful_api::{router, AppState, ServerConfig};
use noteful_db::MemoryStore;

/// Router over a fresh in-memory store, plus the store for direct inspection.
pub fn app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let app = router(AppState::in_memory(store.clone()), &ServerConfig::default());
    (app, store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

async fn read(response: Response) -> TestResponse {
    let status = response.status();
    let header_str = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let location = header_str(header::LOCATION.as_str());
    let request_id = header_str("x-request-id");

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        location,
        request_id,
        body,
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("build request");
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    read(response).await
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, None).await
}

/// POST and return the new resource's id.
pub async fn create(app: &Router, uri: &str, body: Value) -> String {
    let res = post(app, uri, body).await;
    assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
    res.body["id"].as_str().expect("id").to_string()
}

/// Parse an RFC 3339 timestamp field.
pub fn timestamp(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .expect("timestamp")
}

/// A well-formed id that was never issued by the store.
pub const ABSENT_ID: &str = "000000000000000000000000";
