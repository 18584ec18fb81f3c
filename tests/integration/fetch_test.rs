//! Integration tests for the options API client and fetch orchestration

use options_scatter::fetch::{FetchOutcome, FetchStatus, OptionsDataStore};
use options_scatter::polygon::{ChainQuery, PolygonClient, PolygonConfig, API_KEY_PLACEHOLDER};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answer `responses.len()` connections in order, returning each request line
async fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut request_lines = Vec::new();
        for (status_line, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let text = String::from_utf8_lossy(&request).to_string();
            request_lines.push(text.lines().next().unwrap_or_default().to_string());
        }
        request_lines
    });

    (base_url, handle)
}

fn client(base_url: String, api_key: Option<&str>) -> PolygonClient {
    PolygonClient::with_config(PolygonConfig {
        base_url,
        api_key: api_key.map(str::to_string),
        timeout: Some(Duration::from_secs(5)),
        ..Default::default()
    })
    .unwrap()
}

const OK_BODY: &str = r#"{"status":"OK","count":1,"results":[{"strike_price":150,"expiration_date":"2025-06-20","contract_type":"call","open_interest":500,"ticker":"AAPL250620C00150000"}]}"#;

#[tokio::test]
async fn test_forbidden_then_retry() {
    let (base_url, server) = serve(vec![
        ("403 Forbidden", r#"{"status":"NOT_AUTHORIZED","message":"bad key"}"#),
        ("200 OK", OK_BODY),
    ])
    .await;
    let store = OptionsDataStore::new(client(base_url, Some("secret")), ChainQuery::new("AAPL"));

    assert_eq!(store.fetch().await, FetchOutcome::Applied);
    let message = store.error().unwrap();
    assert!(message.contains("403"), "message was {message}");
    assert!(store.data().is_none());

    assert_eq!(store.refetch().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(store.data().map(|d| d.len()), Some(1));

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    assert!(requests[0].contains("underlying_ticker=AAPL"));
}

#[tokio::test]
async fn test_missing_key_is_configuration_error() {
    // nothing listens here; a network attempt would surface as a network error
    let store = OptionsDataStore::new(client("http://127.0.0.1:9".to_string(), None), ChainQuery::default());
    store.fetch().await;

    match store.status() {
        FetchStatus::Error { message, retryable } => {
            assert!(message.starts_with("Configuration error"), "message was {message}");
            assert!(!retryable);
        }
        other => panic!("unexpected status {other:?}"),
    }
}

#[tokio::test]
async fn test_placeholder_key_is_configuration_error() {
    let store = OptionsDataStore::new(
        client("http://127.0.0.1:9".to_string(), Some(API_KEY_PLACEHOLDER)),
        ChainQuery::default(),
    );
    store.fetch().await;
    assert!(store.error().unwrap().starts_with("Configuration error"));
}

#[tokio::test]
async fn test_upstream_status_error() {
    let (base_url, server) = serve(vec![("200 OK", r#"{"status":"ERROR"}"#)]).await;
    let store = OptionsDataStore::new(client(base_url, Some("secret")), ChainQuery::default());
    store.fetch().await;
    server.await.unwrap();

    assert_eq!(store.error().as_deref(), Some("API error: ERROR"));
}

#[tokio::test]
async fn test_ok_without_results_is_empty() {
    let (base_url, server) = serve(vec![("200 OK", r#"{"status":"OK","count":0}"#)]).await;
    let store = OptionsDataStore::new(client(base_url, Some("secret")), ChainQuery::default());
    store.fetch().await;
    server.await.unwrap();

    assert_eq!(store.data().map(|d| d.len()), Some(0));
}
