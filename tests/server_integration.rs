use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{completion_body, create_test_app, create_test_config, post_json, TEST_API_KEY};

async fn start_upstream() -> MockServer {
    MockServer::start().await
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/openai/deployments/balance/completions", server.uri())
}

#[tokio::test]
async fn test_prediction_is_relayed() {
    let upstream = start_upstream().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/balance/completions"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .and(body_json(json!({ "prompt": "What will my balance be?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("42")))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = create_test_app(&create_test_config(endpoint(&upstream)));
    let (status, body) = post_json(
        app,
        "/api/nlc-predict",
        json!({ "prompt": "What will my balance be?" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "predicted_balance": "42" }));
}

#[tokio::test]
async fn test_unreachable_upstream_returns_500() {
    // Nothing listens on the discard port
    let app = create_test_app(&create_test_config("http://127.0.0.1:9/complete".to_string()));
    let (status, body) = post_json(
        app,
        "/api/nlc-predict",
        json!({ "prompt": "hello" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(!error.is_empty());
}

#[tokio::test]
async fn test_upstream_error_status_returns_500() {
    let upstream = start_upstream().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "bad key" })))
        .mount(&upstream)
        .await;

    let app = create_test_app(&create_test_config(endpoint(&upstream)));
    let (status, body) = post_json(
        app,
        "/api/nlc-predict",
        json!({ "prompt": "hello" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_payload_without_choices_returns_500() {
    let upstream = start_upstream().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cmpl-1" })))
        .mount(&upstream)
        .await;

    let app = create_test_app(&create_test_config(endpoint(&upstream)));
    let (status, body) = post_json(
        app,
        "/api/nlc-predict",
        json!({ "prompt": "hello" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("error").is_some());
    assert!(body.get("predicted_balance").is_none());
}

#[rstest]
#[case::number(json!({ "choices": [{ "message": { "content": 42 } }] }), json!({ "predicted_balance": 42 }))]
#[case::null(json!({ "choices": [{ "message": { "content": null } }] }), json!({ "predicted_balance": null }))]
#[case::missing(json!({ "choices": [{ "message": { "role": "assistant" } }] }), json!({}))]
#[tokio::test]
async fn test_non_string_content_is_relayed_untouched(
    #[case] upstream_body: serde_json::Value,
    #[case] expected: serde_json::Value,
) {
    let upstream = start_upstream().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = create_test_app(&create_test_config(endpoint(&upstream)));
    let (status, body) = post_json(
        app,
        "/api/nlc-predict",
        json!({ "prompt": "hello" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn test_empty_choices_returns_500() {
    let upstream = start_upstream().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&upstream)
        .await;

    let app = create_test_app(&create_test_config(endpoint(&upstream)));
    let (status, body) = post_json(
        app,
        "/api/nlc-predict",
        json!({ "prompt": "hello" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("no choices"));
}

#[tokio::test]
async fn test_missing_prompt_is_still_forwarded() {
    let upstream = start_upstream().await;
    Mock::given(method("POST"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("0")))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = create_test_app(&create_test_config(endpoint(&upstream)));
    let (status, body) = post_json(app, "/api/nlc-predict", json!({}).to_string()).await;

    // No validation: the call goes out without a prompt
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "predicted_balance": "0" }));

    let received = upstream.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_are_paired() {
    let upstream = start_upstream().await;
    for (prompt, answer) in [("first", "100"), ("second", "200")] {
        Mock::given(method("POST"))
            .and(body_json(json!({ "prompt": prompt })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(answer))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&upstream)
            .await;
    }

    let app = create_test_app(&create_test_config(endpoint(&upstream)));

    let (first, second) = tokio::join!(
        post_json(
            app.clone(),
            "/api/nlc-predict",
            json!({ "prompt": "first" }).to_string()
        ),
        post_json(
            app.clone(),
            "/api/nlc-predict",
            json!({ "prompt": "second" }).to_string()
        ),
    );

    assert_eq!(first, (StatusCode::OK, json!({ "predicted_balance": "100" })));
    assert_eq!(second, (StatusCode::OK, json!({ "predicted_balance": "200" })));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let app = create_test_app(&create_test_config("http://127.0.0.1:9".to_string()));
    let (status, _) = post_json(app, "/api/nlc-predict", "invalid json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_http_method() {
    let app = create_test_app(&create_test_config("http://127.0.0.1:9".to_string()));

    let request = Request::builder()
        .method("GET")
        .uri("/api/nlc-predict")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_nl_route_absent_without_configuration() {
    let app = create_test_app(&create_test_config("http://127.0.0.1:9".to_string()));
    let (status, _) = post_json(
        app,
        "/predict-from-nl",
        json!({ "input": "ten journals" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = create_test_app(&create_test_config("http://127.0.0.1:9".to_string()));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/nlc-predict")
        .header("origin", "https://dashboard.example.com")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
