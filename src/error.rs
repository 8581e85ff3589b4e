//! Error taxonomy shared by the transport and session orchestrator.

use std::fmt;

/// Coarse error classification surfaced on [`crate::session::Status`].
///
/// Mirrors the taxonomy a connected session can end up in: everything the
/// transport can fail with, plus the two version-handshake outcomes only
/// the orchestrator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No error; only valid while connected or never having connected.
    #[default]
    NoError,
    /// A request did not complete within the configured timeout.
    TimedOut,
    /// A transport-level failure other than timeout or auth (DNS, refused
    /// connection, reset, 5xx treated as generic per spec.md §9).
    ConnectionError,
    /// HTTP basic-auth or Transmission login was rejected.
    AuthenticationError,
    /// The daemon's reply could not be parsed as the expected JSON shape.
    ParseError,
    /// `session-get` reported `rpc-version-minimum` above what this client
    /// speaks.
    ServerIsTooNew,
    /// `session-get` reported `rpc-version` below what this client
    /// requires.
    ServerIsTooOld,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoError => "no error",
            Self::TimedOut => "timed out",
            Self::ConnectionError => "connection error",
            Self::AuthenticationError => "authentication error",
            Self::ParseError => "parse error",
            Self::ServerIsTooNew => "server is too new",
            Self::ServerIsTooOld => "server is too old",
        };
        f.write_str(s)
    }
}

/// Transport-facing error returned by fallible calls that don't go through
/// the `request_failed` notification path (e.g. configuration, base64
/// decode of a caller-supplied `.torrent`).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured server URL could not be parsed.
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A lower-level reqwest failure not covered by the retry/challenge
    /// handling in [`crate::transport::Transport`].
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// A PEM-encoded certificate or key supplied in [`crate::config::TlsConfig`]
    /// could not be parsed.
    #[error("invalid certificate material: {0}")]
    InvalidCertificate(String),
    /// Session was not connected when the operation was attempted.
    #[error("not connected")]
    NotConnected,
}

/// The long-form error text composed for [`crate::session::Status::detailed_error_message`].
///
/// Built up incrementally as the transport observes contributing facts, per
/// spec.md §7: network error code/phrase, request URL, HTTP status, TLS
/// exceptions observed, and response headers.
#[derive(Debug, Clone, Default)]
pub struct DetailedError {
    parts: Vec<String>,
}

impl DetailedError {
    /// Start a fresh detail buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the request URL (including the final, possibly redirected,
    /// location).
    pub fn with_url(mut self, url: &str) -> Self {
        self.parts.push(format!("url: {url}"));
        self
    }

    /// Record an HTTP status code and its canonical reason phrase.
    pub fn with_status(mut self, status: reqwest::StatusCode) -> Self {
        self.parts.push(format!(
            "http status: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown")
        ));
        self
    }

    /// Record the underlying transport error's code and message.
    pub fn with_transport_error(mut self, err: &reqwest::Error) -> Self {
        self.parts.push(format!("transport error: {err}"));
        self
    }

    /// Record whether the connection was encrypted.
    pub fn with_encryption_used(mut self, used: bool) -> Self {
        self.parts.push(format!("encryption used: {used}"));
        self
    }

    /// Record a response header pair observed on the failing exchange.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.parts.push(format!("header {name}: {value}"));
        self
    }

    /// Record a pre-authorized TLS exception (hostname mismatch,
    /// self-signed, self-signed-in-chain) along with the certificate
    /// subject that triggered it.
    pub fn with_tls_exception(mut self, kind: &str, subject: &str) -> Self {
        self.parts
            .push(format!("tls exception ({kind}): subject={subject}"));
        self
    }

    /// Append a free-form note (used for the Transmission session-id
    /// challenge and other protocol-specific context).
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.parts.push(note.into());
        self
    }

    /// Render the final multi-line detail text.
    pub fn finish(self) -> String {
        self.parts.join("\n")
    }
}
