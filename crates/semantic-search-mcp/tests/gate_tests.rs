//! Connection pool lifecycle through the client.

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use semantic_search_mcp::client::SemanticScholarClient;
use semantic_search_mcp::config::Config;
use semantic_search_mcp::models::WireParams;

async fn mock_ok() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_close_before_first_request() {
    let client = SemanticScholarClient::new(Config::for_testing("http://localhost:1")).unwrap();
    assert!(!client.gate().is_open());

    client.close();
    client.close();
    assert!(!client.gate().is_open());
}

#[tokio::test]
async fn test_pool_created_on_first_request_and_closed_once() {
    let mock_server = mock_ok().await;
    let client = SemanticScholarClient::new(Config::for_testing(&mock_server.uri())).unwrap();

    client.get("/graph/v1/paper/a", &WireParams::new()).await.unwrap();
    assert!(client.gate().is_open());

    client.close();
    client.close();
    assert!(!client.gate().is_open());
}

#[tokio::test]
async fn test_request_after_close_rebuilds_pool() {
    let mock_server = mock_ok().await;
    let client = SemanticScholarClient::new(Config::for_testing(&mock_server.uri())).unwrap();

    client.get("/graph/v1/paper/a", &WireParams::new()).await.unwrap();
    client.close();

    let result = client.get("/graph/v1/paper/b", &WireParams::new()).await.unwrap();
    assert_eq!(result["ok"], true);
    assert!(client.gate().is_open());
}

#[tokio::test]
async fn test_clones_share_one_pool() {
    let mock_server = mock_ok().await;
    let client = SemanticScholarClient::new(Config::for_testing(&mock_server.uri())).unwrap();
    let clone = client.clone();
    let empty = WireParams::new();

    let (a, b) = tokio::join!(
        client.get("/graph/v1/paper/a", &empty),
        clone.get("/graph/v1/paper/b", &empty),
    );
    a.unwrap();
    b.unwrap();

    clone.close();
    assert!(!client.gate().is_open());
}

#[tokio::test]
async fn test_delay_applied_before_request() {
    let mock_server = mock_ok().await;
    let mut config = Config::for_testing(&mock_server.uri());
    config.rate_limit_delay = std::time::Duration::from_millis(150);
    let client = SemanticScholarClient::new(config).unwrap();

    let started = std::time::Instant::now();
    client.get("/graph/v1/paper/a", &WireParams::new()).await.unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(150));
}
