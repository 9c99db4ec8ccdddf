//! Integration tests for the Google Input Tools provider against a mock
//! HTTP server.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use canto_fetcher::{FetchError, GoogleInputProvider, RetryingFetcher, SuggestionProvider};

#[tokio::test]
async fn fetch_decodes_suggestions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/request"))
        .and(query_param("text", "hoenggong"))
        .and(query_param("itc", "yue-hant-t-i0-und"))
        .and(query_param("num", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "SUCCESS",
            [[
                "hoenggong",
                ["香港", "香"],
                [],
                {
                    "annotation": ["hoeng gong", "hoeng"],
                    "matched_length": [9, 5]
                }
            ]]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GoogleInputProvider::new().with_base_url(format!("{}/request", server.uri()));
    let suggestions = provider.fetch("hoenggong", 12).await.unwrap();

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].word, "香港");
    assert_eq!(suggestions[0].annotation, "hoeng gong");
    assert_eq!(suggestions[0].matched_length, 9);
}

#[tokio::test]
async fn non_success_status_is_a_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["FAILED_TO_PARSE_REQUEST_BODY"])),
        )
        .mount(&server)
        .await;

    let provider = GoogleInputProvider::new().with_base_url(format!("{}/request", server.uri()));
    let result = provider.fetch("hoeng", 6).await;

    assert!(matches!(result, Err(FetchError::Protocol(_))));
}

#[tokio::test]
async fn http_failure_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = GoogleInputProvider::new().with_base_url(format!("{}/request", server.uri()));
    let result = provider.fetch("hoeng", 6).await;

    assert!(matches!(result, Err(FetchError::Http(_))));
}

#[tokio::test]
async fn fetcher_retries_until_the_server_recovers() {
    let server = MockServer::start().await;
    // Two failures, then success.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "SUCCESS",
            [["hoeng", ["香"], [], { "annotation": ["hoeng"] }]]
        ])))
        .mount(&server)
        .await;

    let provider = GoogleInputProvider::new().with_base_url(format!("{}/request", server.uri()));
    let fetcher = RetryingFetcher::new(provider);

    let result = fetcher.fetch("hoeng", 1).await.unwrap();
    assert_eq!(result.suggestions[0].word, "香");
    assert_eq!(result.requested_pages, 1);
    assert_eq!(result.max_pages, 1);
}
