//! Transport-layer scenarios from spec.md §8: the session-id challenge
//! (S2), timeout-with-retry (S3), and the 401/5xx retry classification
//! the source leaves ambiguous (spec.md §9 Open Question).

use httpmock::MockServer;
use httpmock::prelude::*;
use serde_json::json;

use transmission_mirror::config::{Auth, Proxy, ServerConfig, Timings, TlsConfig};
use transmission_mirror::transport::{PostError, RequestType, Transport};

fn config_for(server: &MockServer, timeout_seconds: Option<u64>) -> ServerConfig {
    ServerConfig {
        name: "test".into(),
        address: server.address().ip().to_string(),
        port: server.address().port(),
        api_path: "/transmission/rpc".into(),
        https: false,
        proxy: Proxy::Default,
        tls: TlsConfig::default(),
        auth: Auth::default(),
        timings: Timings {
            timeout_seconds: timeout_seconds.unwrap_or(15),
            retry_attempts: 2,
            ..Timings::default()
        },
    }
}

#[tokio::test]
async fn s2_session_id_challenge_is_retried_without_consuming_an_attempt() {
    let server = MockServer::start_async().await;

    let challenge = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/transmission/rpc")
                .matches(|req| !req.headers.iter().flatten().any(|(k, _)| k == "X-Transmission-Session-Id"));
            then.status(409).header("X-Transmission-Session-Id", "abc");
        })
        .await;

    let retried = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/transmission/rpc")
                .header("X-Transmission-Session-Id", "abc");
            then.status(200)
                .json_body(json!({ "result": "success", "arguments": { "rpc-version": 17 } }));
        })
        .await;

    let transport = Transport::new();
    transport.configure(config_for(&server, None)).await.unwrap();

    let reply = transport
        .post("session-get", json!({}), RequestType::Independent)
        .await
        .unwrap();

    assert!(reply.success);
    assert_eq!(transport.session_id().await.as_deref(), Some("abc"));
    challenge.assert_async().await;
    retried.assert_async().await;
}

#[tokio::test]
async fn s3_timeout_retries_exactly_twice_then_surfaces_failure() {
    let server = MockServer::start_async().await;
    let slow = server
        .mock_async(|when, then| {
            when.method(POST).path("/transmission/rpc");
            then.status(200).delay(std::time::Duration::from_secs(2));
        })
        .await;

    let transport = Transport::new();
    transport
        .configure(config_for(&server, Some(1)))
        .await
        .unwrap();

    let result = transport
        .post("session-get", json!({}), RequestType::Independent)
        .await;

    match result {
        Err(PostError::Failed(failure)) => {
            assert_eq!(failure.kind, transmission_mirror::ErrorKind::TimedOut);
        }
        other => panic!("expected a timeout failure, got {other:?}"),
    }
    assert_eq!(slow.hits_async().await, 3);
}

#[tokio::test]
async fn authentication_failure_is_not_retried() {
    let server = MockServer::start_async().await;
    let unauthorized = server
        .mock_async(|when, then| {
            when.method(POST).path("/transmission/rpc");
            then.status(401);
        })
        .await;

    let transport = Transport::new();
    transport.configure(config_for(&server, None)).await.unwrap();

    let result = transport
        .post("session-get", json!({}), RequestType::Independent)
        .await;

    match result {
        Err(PostError::Failed(failure)) => {
            assert_eq!(failure.kind, transmission_mirror::ErrorKind::AuthenticationError);
        }
        other => panic!("expected an authentication failure, got {other:?}"),
    }
    assert_eq!(unauthorized.hits_async().await, 1);
}

#[tokio::test]
async fn server_error_is_treated_as_connection_error_and_retried() {
    let server = MockServer::start_async().await;
    let broken = server
        .mock_async(|when, then| {
            when.method(POST).path("/transmission/rpc");
            then.status(502);
        })
        .await;

    let transport = Transport::new();
    transport.configure(config_for(&server, None)).await.unwrap();

    let result = transport
        .post("session-get", json!({}), RequestType::Independent)
        .await;

    match result {
        Err(PostError::Failed(failure)) => {
            assert_eq!(failure.kind, transmission_mirror::ErrorKind::ConnectionError);
        }
        other => panic!("expected a connection-error failure, got {other:?}"),
    }
    assert_eq!(broken.hits_async().await, 3);
}
