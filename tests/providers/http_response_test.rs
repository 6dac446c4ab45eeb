//! HTTP response sanitization and truncation tests.

use penwright::providers::{check_http_response, TransportError};

use crate::http::serve_once;

async fn checked(status_line: &str, body: &str) -> Result<String, TransportError> {
    let served = serve_once(status_line, "text/plain", body).await;
    let response = match reqwest::get(format!("{}/", served.url)).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };
    check_http_response(response).await
}

#[tokio::test]
async fn check_http_response_returns_body_on_success() {
    let body = checked("200 OK", "plain body").await.expect("success status");
    assert_eq!(body, "plain body");
}

#[tokio::test]
async fn check_http_response_redacts_token_like_values() {
    let raw_token = "sk-abcdefghijklmnopqrstuvwxyz0123456789";
    let body = format!("invalid key {raw_token}");

    match checked("401 Unauthorized", &body).await {
        Err(TransportError::HttpStatus { status, body }) => {
            assert_eq!(status, 401);
            assert!(!body.contains(raw_token));
            assert!(body.contains("[REDACTED]"));
        }
        other => panic!("expected http status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn check_http_response_truncates_long_error_body() {
    let body = "x".repeat(400);

    match checked("500 Internal Server Error", &body).await {
        Err(TransportError::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.ends_with("...[truncated]"));
        }
        other => panic!("expected http status error, got: {other:?}"),
    }
}
