//! Pipeline behaviour against a mock backend: bearer attachment, the
//! one-shot refresh-and-retry on 401, and uniform error surfacing.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use studia_client::{ClientConfig, RequestPipeline, TokenStore};
use studia_domain::ErrorKind;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct TestResponse {
    message: String,
}

fn pipeline_for(server: &MockServer) -> (Arc<RequestPipeline>, Arc<TokenStore>) {
    studia_client::observability::init_tracing();
    let config = ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(500),
        ..Default::default()
    };
    let tokens = Arc::new(TokenStore::new());
    let pipeline = Arc::new(RequestPipeline::new(config, tokens.clone()).unwrap());
    (pipeline, tokens)
}

fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer",
    })
}

#[tokio::test]
async fn success_sends_bearer_and_client_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("Authorization", "Bearer a1"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "application/json"))
        .and(header("x-app-name", "studia"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "hello"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("a1", "r1", "Bearer").await;

    let response: TestResponse = pipeline.get("/profile").await.unwrap();
    assert_eq!(response.message, "hello");
}

#[tokio::test]
async fn unauthenticated_requests_omit_the_bearer_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "open"})),
        )
        .mount(&server)
        .await;

    let (pipeline, _tokens) = pipeline_for(&server);
    let _: TestResponse = pipeline.get("/public").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("Authorization").is_none());
}

// Scenario A: 401, successful refresh, retried request succeeds with the
// new token, and the store holds the new pair.
#[tokio::test]
async fn refresh_then_retry_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Bearer stale-a"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(serde_json::json!({"refreshToken": "stale-r"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh-a", "fresh-r")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Bearer fresh-a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "retried"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("stale-a", "stale-r", "Bearer").await;

    let response: TestResponse = pipeline.get("/data").await.unwrap();
    assert_eq!(response.message, "retried");
    assert_eq!(tokens.access_token().await.as_deref(), Some("fresh-a"));
    assert_eq!(tokens.refresh_token().await.as_deref(), Some("fresh-r"));
}

// Scenario B: the refresh exchange itself is rejected; the store is cleared
// and the call surfaces UNAUTHORIZED.
#[tokio::test]
async fn failed_refresh_clears_store_and_surfaces_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("stale-a", "stale-r", "Bearer").await;

    let err = pipeline.get::<TestResponse>("/data").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert!(!tokens.is_authorized().await);
    assert_eq!(tokens.access_token().await, None);
}

#[tokio::test]
async fn second_401_after_refresh_is_final() {
    let server = MockServer::start().await;

    // The protected resource rejects even the refreshed token.
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh-a", "fresh-r")))
        .expect(1)
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("stale-a", "stale-r", "Bearer").await;

    let err = pipeline.get::<TestResponse>("/data").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn missing_refresh_token_skips_the_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    // No refresh mock mounted: hitting it would 404 and fail the kind check.
    let (pipeline, _tokens) = pipeline_for(&server);
    let err = pipeline.get::<TestResponse>("/data").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

// Scenario D: timeouts never trigger a retry.
#[tokio::test]
async fn timeout_maps_to_timeout_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("a1", "r1", "Bearer").await;

    let err = pipeline.get::<TestResponse>("/slow").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn connection_refused_maps_to_network() {
    let config = ClientConfig {
        // Bound-then-dropped port; nothing is listening.
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_millis(500),
        ..Default::default()
    };
    let pipeline = RequestPipeline::new(config, Arc::new(TokenStore::new())).unwrap();

    let err = pipeline.get::<TestResponse>("/anything").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}

// Scenario E: concurrent 401s each refresh independently; both calls
// ultimately succeed and the store reflects the last refresh to land.
#[tokio::test]
async fn concurrent_401s_refresh_independently() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Bearer stale-a"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // Same fresh pair for every exchange; duplicated refreshes are allowed.
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh-a", "fresh-r")))
        .expect(1..=2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Bearer fresh-a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})),
        )
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("stale-a", "stale-r", "Bearer").await;

    let first = pipeline.clone();
    let second = pipeline.clone();
    let (a, b) = tokio::join!(
        async move { first.get::<TestResponse>("/data").await },
        async move { second.get::<TestResponse>("/data").await },
    );

    assert_eq!(a.unwrap().message, "ok");
    assert_eq!(b.unwrap().message, "ok");
    assert_eq!(tokens.access_token().await.as_deref(), Some("fresh-a"));
    assert_eq!(tokens.refresh_token().await.as_deref(), Some("fresh-r"));
}

#[tokio::test]
async fn non_success_statuses_map_through_the_table() {
    let cases =
        [(403, ErrorKind::Forbidden), (404, ErrorKind::NotFound), (500, ErrorKind::Server)];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/res"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let (pipeline, tokens) = pipeline_for(&server);
        tokens.save_tokens("a1", "r1", "Bearer").await;

        let err = pipeline.get::<TestResponse>("/res").await.unwrap_err();
        assert_eq!(err.kind, expected, "status {status}");
    }
}

#[tokio::test]
async fn structured_error_body_flows_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/res"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "code": 3001,
            "message": "Invalid email",
            "details": "missing domain",
        })))
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("a1", "r1", "Bearer").await;

    let err = pipeline.get::<TestResponse>("/res").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Invalid email");
    assert_eq!(err.details.as_deref(), Some("missing domain"));
}

#[tokio::test]
async fn no_content_deserializes_into_unit() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/courses/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("a1", "r1", "Bearer").await;

    let result: Result<(), _> = pipeline.delete("/courses/1").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn malformed_success_body_is_surfaced_not_thrown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/res"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let (pipeline, tokens) = pipeline_for(&server);
    tokens.save_tokens("a1", "r1", "Bearer").await;

    let err = pipeline.get::<TestResponse>("/res").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unknown);
    assert!(err.details.is_some());
}
