//! Integration tests for `TwitterClient` using wiremock HTTP mocks.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tweetpulse_twitter::{retry_on_rate_limit, RetryPolicy, SearchError, TwitterClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TwitterClient {
    TwitterClient::with_base_url("test-token", 30, "tweetpulse-test", base_url)
        .expect("client construction should not fail")
}

fn three_tweets() -> serde_json::Value {
    serde_json::json!({
        "data": [
            { "id": "1", "text": "I love this!", "lang": "en" },
            { "id": "2", "text": "It's okay.", "lang": "en" },
            { "id": "3", "text": "This is terrible.", "lang": "en" }
        ],
        "meta": { "result_count": 3, "newest_id": "3", "oldest_id": "1" }
    })
}

#[tokio::test]
async fn search_recent_returns_texts_in_provider_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "openai"))
        .and(query_param("max_results", "20"))
        .and(query_param("tweet.fields", "text,lang"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tweets()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client
        .search_recent("openai", 20)
        .await
        .expect("search should succeed");

    let texts: Vec<&str> = posts.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, ["I love this!", "It's okay.", "This is terrible."]);
    assert_eq!(posts[0].id.as_deref(), Some("1"));
    assert_eq!(posts[0].lang.as_deref(), Some("en"));
}

#[tokio::test]
async fn search_recent_without_data_returns_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "zzz_no_match_xyz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": { "result_count": 0 }
            })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client
        .search_recent("zzz_no_match_xyz", 20)
        .await
        .expect("empty search is not an error");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn small_bound_is_clamped_outbound_and_truncated_inbound() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("max_results", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tweets()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client.search_recent("openai", 2).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].text, "It's okay.");
}

#[tokio::test]
async fn unauthorized_maps_to_unauthorized_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "title": "Unauthorized",
            "type": "about:blank",
            "status": 401,
            "detail": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_recent("openai", 20).await.unwrap_err();
    assert!(
        matches!(err, SearchError::Unauthorized { status: 401, ref message } if message == "Unauthorized"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_recent("openai", 20).await.unwrap_err();
    assert!(
        matches!(err, SearchError::Api { status: 503, ref message } if message == "over capacity"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn errors_only_body_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [
                { "title": "Invalid Request", "detail": "There were errors processing your request: query is empty" }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_recent("openai", 20).await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("query is empty"), "got: {msg}");
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_recent("openai", 20).await.unwrap_err();
    assert!(matches!(err, SearchError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn too_many_requests_carries_reset_time() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-reset", "1700000000")
                .set_body_json(serde_json::json!({ "title": "Too Many Requests" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_recent("openai", 20).await.unwrap_err();
    match err {
        SearchError::RateLimited { reset_at } => {
            assert_eq!(reset_at.map(|t| t.timestamp()), Some(1_700_000_000));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limited_request_is_reissued_once_with_identical_parameters() {
    let server = MockServer::start().await;
    let reset = (chrono::Utc::now() - chrono::Duration::seconds(1)).timestamp();

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "openai"))
        .and(query_param("max_results", "20"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("x-rate-limit-reset", reset.to_string()),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "openai"))
        .and(query_param("max_results", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tweets()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let policy = RetryPolicy::new(3, Duration::ZERO, Duration::from_secs(5));
    let posts = retry_on_rate_limit(&policy, &CancellationToken::new(), || {
        client.search_recent("openai", 20)
    })
    .await
    .expect("second attempt should succeed");

    assert_eq!(posts.len(), 3);
    server.verify().await;
}
