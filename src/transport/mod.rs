//! Transport (Request Router): owns the HTTP client, TLS/proxy
//! configuration, basic-auth header, and the current Transmission
//! session id (spec.md §4.1).
//!
//! Each `post()` call is driven by a dedicated spawned task so that
//! [`Transport::cancel_pending_and_clear_session_id`] can abort in-flight
//! work without the caller having to poll a cancellation flag — aborting
//! the task drops its response sender, which is how `post()` distinguishes
//! a genuine failure from "this session was torn down mid-request"
//! (spec.md §9 "Per-request callbacks").

pub mod tls;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::error::{DetailedError, Error, ErrorKind};
use crate::rpc::{self, RpcResponse};

const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

/// Distinguishes requests the orchestrator polls for outstanding count
/// (`has_pending_data_update_requests`) from one-off writes (spec.md
/// §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    DataUpdate,
    Independent,
}

/// A failure the transport could not retry past.
#[derive(Debug, Clone)]
pub struct RequestFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub detailed_message: String,
}

/// Outcome of a `post()` call that did not produce an `RpcResponse`.
#[derive(Debug)]
pub enum PostError {
    /// A genuine network/timeout/auth/parse failure (spec.md §7).
    Failed(RequestFailure),
    /// The transport was reconfigured or disconnected while this request
    /// was in flight; no notification should be raised for it.
    Cancelled,
}

struct State {
    client: Client,
    config: Option<ServerConfig>,
    session_id: Option<String>,
}

struct Inner {
    state: Mutex<State>,
    in_flight: Mutex<HashMap<u64, JoinHandle<()>>>,
    pending_data_updates: AtomicU64,
    next_request_id: AtomicU64,
}

/// Cheaply cloneable handle to the transport; the session orchestrator
/// holds one and shares it with spawned sub-fetch tasks.
#[derive(Clone)]
pub struct Transport {
    inner: Arc<Inner>,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    client: Client::new(),
                    config: None,
                    session_id: None,
                }),
                in_flight: Mutex::new(HashMap::new()),
                pending_data_updates: AtomicU64::new(0),
                next_request_id: AtomicU64::new(0),
            }),
        }
    }

    /// Apply a new configuration atomically, clearing the session id and
    /// aborting in-flight requests (spec.md §4.1).
    pub async fn configure(&self, config: ServerConfig) -> Result<(), Error> {
        let client = tls::build_client(&config)?;
        {
            let mut state = self.inner.state.lock().await;
            state.client = client;
            state.config = Some(config);
            state.session_id = None;
        }
        self.cancel_pending_and_clear_session_id().await;
        Ok(())
    }

    pub async fn session_id(&self) -> Option<String> {
        self.inner.state.lock().await.session_id.clone()
    }

    /// Whether any `DataUpdate`-typed request is currently in flight
    /// (spec.md §4.1).
    pub fn has_pending_data_update_requests(&self) -> bool {
        self.inner.pending_data_updates.load(Ordering::SeqCst) > 0
    }

    /// Abort all in-flight requests and parsing tasks and clear the
    /// session id (spec.md §4.1).
    pub async fn cancel_pending_and_clear_session_id(&self) {
        let mut in_flight = self.inner.in_flight.lock().await;
        for (_, handle) in in_flight.drain() {
            handle.abort();
        }
        drop(in_flight);
        self.inner.pending_data_updates.store(0, Ordering::SeqCst);
        self.inner.state.lock().await.session_id = None;
    }

    /// Issue one RPC call. Resolves to `Ok` for both success and
    /// daemon-reported failure replies (`result != "success"`); only
    /// transport-level failures or cancellation produce `Err` (spec.md
    /// §4.1, §7).
    pub async fn post(
        &self,
        method: &str,
        arguments: Value,
        request_type: RequestType,
    ) -> Result<RpcResponse, PostError> {
        let request_id = self.inner.next_request_id.fetch_add(1, Ordering::SeqCst);
        if request_type == RequestType::DataUpdate {
            self.inner.pending_data_updates.fetch_add(1, Ordering::SeqCst);
        }

        let (tx, rx) = oneshot::channel();
        let body = rpc::build_request(method, arguments);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let outcome = run_with_retries(&inner, body).await;
            let _ = tx.send(outcome);
        });
        self.inner.in_flight.lock().await.insert(request_id, handle);

        let outcome = rx.await;

        self.inner.in_flight.lock().await.remove(&request_id);
        if request_type == RequestType::DataUpdate {
            self.inner.pending_data_updates.fetch_sub(1, Ordering::SeqCst);
        }

        outcome.unwrap_or(Err(PostError::Cancelled))
    }
}

async fn run_with_retries(inner: &Inner, body: Value) -> Result<RpcResponse, PostError> {
    let retry_attempts = {
        let state = inner.state.lock().await;
        state
            .config
            .as_ref()
            .map(|c| c.timings.retry_attempts)
            .unwrap_or(2)
    };

    let mut attempt = 0;
    loop {
        match run_once(inner, &body).await {
            Outcome::Response(response) => return Ok(response),
            Outcome::Retry => {
                // session-id challenge: doesn't consume an attempt.
                continue;
            }
            Outcome::Failure(failure) if should_retry(failure.kind) && attempt < retry_attempts => {
                attempt += 1;
            }
            Outcome::Failure(failure) => return Err(PostError::Failed(failure)),
        }
    }
}

fn should_retry(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::TimedOut | ErrorKind::ConnectionError)
}

enum Outcome {
    Response(RpcResponse),
    Retry,
    Failure(RequestFailure),
}

async fn run_once(inner: &Inner, body: &Value) -> Outcome {
    let (client, url, session_id, auth) = {
        let state = inner.state.lock().await;
        let Some(config) = state.config.as_ref() else {
            return Outcome::Failure(RequestFailure {
                kind: ErrorKind::ConnectionError,
                message: "no server configured".into(),
                detailed_message: DetailedError::new()
                    .with_note("transport was never configured")
                    .finish(),
            });
        };
        (
            state.client.clone(),
            config.rpc_url(),
            state.session_id.clone(),
            config.auth.clone(),
        )
    };

    let mut request = client.post(&url).json(body);
    if let Some(id) = &session_id {
        request = request.header(SESSION_ID_HEADER, id);
    }
    if auth.enabled {
        request = request.basic_auth(&auth.username, Some(&auth.password));
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => return Outcome::Failure(classify_transport_error(&err, &url)),
    };

    if response.status() == StatusCode::CONFLICT {
        if let Some(new_id) = response
            .headers()
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            inner.state.lock().await.session_id = Some(new_id.to_string());
        }
        return Outcome::Retry;
    }

    if response.status() == StatusCode::UNAUTHORIZED || response.status() == StatusCode::FORBIDDEN {
        let detailed = DetailedError::new()
            .with_url(&url)
            .with_status(response.status())
            .finish();
        return Outcome::Failure(RequestFailure {
            kind: ErrorKind::AuthenticationError,
            message: "authentication rejected".into(),
            detailed_message: detailed,
        });
    }

    if response.status().is_server_error() {
        let detailed = DetailedError::new()
            .with_url(&url)
            .with_status(response.status())
            .finish();
        return Outcome::Failure(RequestFailure {
            kind: ErrorKind::ConnectionError,
            message: format!("server error: {}", response.status()),
            detailed_message: detailed,
        });
    }

    if !response.status().is_success() {
        let detailed = DetailedError::new()
            .with_url(&url)
            .with_status(response.status())
            .finish();
        return Outcome::Failure(RequestFailure {
            kind: ErrorKind::ConnectionError,
            message: format!("unexpected status: {}", response.status()),
            detailed_message: detailed,
        });
    }

    let body = match response.json::<Value>().await {
        Ok(body) => body,
        Err(err) => {
            let detailed = DetailedError::new()
                .with_url(&url)
                .with_transport_error(&err)
                .finish();
            return Outcome::Failure(RequestFailure {
                kind: ErrorKind::ParseError,
                message: "malformed json body".into(),
                detailed_message: detailed,
            });
        }
    };

    match rpc::RpcResponse::parse(&body) {
        Some(response) => Outcome::Response(response),
        None => Outcome::Failure(RequestFailure {
            kind: ErrorKind::ParseError,
            message: "reply missing result/arguments".into(),
            detailed_message: DetailedError::new().with_url(&url).finish(),
        }),
    }
}

fn classify_transport_error(err: &reqwest::Error, url: &str) -> RequestFailure {
    let kind = if err.is_timeout() {
        ErrorKind::TimedOut
    } else {
        ErrorKind::ConnectionError
    };
    let detailed = DetailedError::new()
        .with_url(url)
        .with_transport_error(err)
        .finish();
    RequestFailure {
        kind,
        message: err.to_string(),
        detailed_message: detailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_retry_covers_only_transient_classes() {
        assert!(should_retry(ErrorKind::TimedOut));
        assert!(should_retry(ErrorKind::ConnectionError));
        assert!(!should_retry(ErrorKind::AuthenticationError));
        assert!(!should_retry(ErrorKind::ParseError));
    }
}
