#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use nlc_predict::{
    config::{Config, InferenceConfig, ServerConfig},
    server,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

pub const TEST_API_KEY: &str = "test-api-key";

/// Create a test configuration pointing at the given upstream URL
pub fn create_test_config(endpoint_url: String) -> Config {
    Config {
        server: ServerConfig::default(),
        inference: InferenceConfig {
            endpoint_url,
            api_key: TEST_API_KEY.to_string(),
        },
        structuring: None,
    }
}

pub fn create_test_app(config: &Config) -> Router {
    server::router(server::build_state(config), &config.server).unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Upstream completion body with a single choice
pub fn completion_body(content: &str) -> Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}
