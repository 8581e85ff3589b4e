//! Session-orchestrator scenarios from spec.md §8: S1 (version handshake
//! rejects an old daemon) and S6 (a duplicate `torrent-add` reply is
//! surfaced without a behind-the-scenes full update).

use std::time::Duration;

use httpmock::MockServer;
use httpmock::prelude::*;
use serde_json::json;

use transmission_mirror::config::{Auth, Proxy, ServerConfig, Timings, TlsConfig};
use transmission_mirror::parameters::AddTorrentParamsBuilder;
use transmission_mirror::session::{AddTorrentOutcome, ConnectionState, Session};

fn config_for(server: &MockServer) -> ServerConfig {
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
            update_interval_seconds: 3600,
            timeout_seconds: 5,
            retry_attempts: 0,
            ..Timings::default()
        },
    }
}

fn body_has_method(req: &httpmock::HttpMockRequest, method: &str) -> bool {
    req.body
        .as_ref()
        .map(|body| String::from_utf8_lossy(body).contains(method))
        .unwrap_or(false)
}

fn body_contains(req: &httpmock::HttpMockRequest, needle: &str) -> bool {
    req.body
        .as_ref()
        .map(|body| String::from_utf8_lossy(body).contains(needle))
        .unwrap_or(false)
}

async fn wait_for_connected(status: &mut tokio::sync::watch::Receiver<transmission_mirror::session::Status>) {
    loop {
        if status.borrow().state == ConnectionState::Connected {
            return;
        }
        status.changed().await.expect("status channel closed before connecting");
    }
}

#[tokio::test]
async fn s1_server_too_old_never_reaches_connected() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/transmission/rpc");
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "rpc-version": 13, "rpc-version-minimum": 1 }
        }));
    }).await;

    let session = Session::spawn();
    session.reconfigure(config_for(&server)).await;
    session.connect().await;

    let mut status = session.status();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if status.borrow().state == ConnectionState::Disconnected && status.borrow().error_message.contains("old")
            {
                return;
            }
            status.changed().await.unwrap();
        }
    })
    .await
    .expect("session should report the server as too old");

    assert_eq!(status.borrow().state, ConnectionState::Disconnected);
}

#[tokio::test]
async fn s6_duplicate_add_is_reported_without_a_full_update() {
    let server = MockServer::start_async().await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "session-get"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "rpc-version": 17, "rpc-version-minimum": 1 }
        }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "torrent-get"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "torrents": [] }
        }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "session-stats"));
        then.status(200).json_body(json!({ "result": "success", "arguments": {} }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "torrent-add"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "torrent-duplicate": { "id": 42 } }
        }));
    }).await;

    let session = Session::spawn();
    session.reconfigure(config_for(&server)).await;
    session.connect().await;
    wait_for_connected(&mut session.status()).await;

    let mut events = session.subscribe_events();
    let params = AddTorrentParamsBuilder::default()
        .filename("magnet:?xt=urn:btih:deadbeef")
        .build()
        .unwrap();

    let outcome = session.add_torrent(params).await.unwrap();
    assert!(matches!(outcome, AddTorrentOutcome::Duplicate(Some(42))));

    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("a duplicate event should fire")
        .unwrap();
    assert!(matches!(
        event,
        transmission_mirror::session::Event::TorrentAddDuplicate { id: Some(42) }
    ));
}

/// A newly added, already metadata-complete torrent gets its
/// `is_single_file` resolved via the `["id","priorities"]` follow-up
/// before `torrent_added` fires (spec.md §4.4 "checkSingleFile").
#[tokio::test]
async fn newly_added_complete_torrent_resolves_single_file_before_torrent_added_fires() {
    let server = MockServer::start_async().await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "session-get"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "rpc-version": 17, "rpc-version-minimum": 1 }
        }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "torrent-get") && !body_contains(req, "priorities"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "torrents": [{
                "id": 7,
                "hashString": "abc123",
                "name": "one-file-torrent",
                "metadataPercentComplete": 1.0,
                "leftUntilDone": 100
            }] }
        }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_contains(req, "priorities"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "torrents": [{ "id": 7, "priorities": [5] }] }
        }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "session-stats"));
        then.status(200).json_body(json!({ "result": "success", "arguments": {} }));
    }).await;

    let session = Session::spawn();
    let mut events = session.subscribe_events();
    session.reconfigure(config_for(&server)).await;
    session.connect().await;
    wait_for_connected(&mut session.status()).await;

    let event = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let transmission_mirror::session::Event::TorrentAdded(torrent) =
                events.recv().await.unwrap()
            {
                return torrent;
            }
        }
    })
    .await
    .expect("torrent_added should fire for the newly added torrent");

    assert_eq!(event.id, 7);
    assert_eq!(event.is_single_file, Some(true));

    let snapshot = session.torrent_by_id(7).expect("torrent should be in the mirror");
    assert_eq!(snapshot.is_single_file, Some(true));
}

/// A successful write that changes visible state triggers a re-sync
/// (spec.md §4.4 "Write operations").
#[tokio::test]
async fn successful_write_triggers_resync() {
    let server = MockServer::start_async().await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "session-get"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "rpc-version": 17, "rpc-version-minimum": 1 }
        }));
    }).await;

    let torrent_get_mock = server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "torrent-get"));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "torrents": [] }
        }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "session-stats"));
        then.status(200).json_body(json!({ "result": "success", "arguments": {} }));
    }).await;

    server.mock_async(|when, then| {
        when.method(POST)
            .path("/transmission/rpc")
            .matches(|req| body_has_method(req, "torrent-start"));
        then.status(200).json_body(json!({ "result": "success", "arguments": {} }));
    }).await;

    let session = Session::spawn();
    session.reconfigure(config_for(&server)).await;
    session.connect().await;
    wait_for_connected(&mut session.status()).await;

    let hits_before = torrent_get_mock.hits_async().await;
    let ok = session.torrent_start(vec![1]).await.unwrap();
    assert!(ok);

    tokio::time::timeout(Duration::from_secs(1), async {
        while torrent_get_mock.hits_async().await <= hits_before {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("a successful write should trigger a re-sync torrent-get");
}
