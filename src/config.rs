//! Server configuration accepted by the session orchestrator.
//!
//! Persistence is the caller's responsibility (spec.md §6); these types
//! only need to be plain, serde-friendly value types.

use serde::{Deserialize, Serialize};

/// Proxy selection for the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proxy {
    /// Use whatever the environment/system configures (or none).
    Default,
    /// An explicit HTTP proxy.
    Http {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
    },
    /// An explicit SOCKS5 proxy.
    Socks5 {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
    },
}

impl Default for Proxy {
    fn default() -> Self {
        Self::Default
    }
}

/// TLS trust customization for HTTPS servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain to trust in addition to (or instead
    /// of) the platform trust store, for self-signed daemons.
    pub self_signed_certificate: Option<String>,
    /// PEM-encoded client certificate, paired with its private key, for
    /// mutual-TLS daemons.
    pub client_certificate: Option<ClientCertificate>,
}

/// A client certificate + private key pair, both PEM-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCertificate {
    pub certificate_pem: String,
    pub private_key_pem: String,
}

/// HTTP basic-auth credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub enabled: bool,
    pub username: String,
    pub password: String,
}

/// Timing knobs for the update cycle, request timeout, and auto-reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub update_interval_seconds: u64,
    pub timeout_seconds: u64,
    pub auto_reconnect: bool,
    pub auto_reconnect_interval_seconds: u64,
    /// Retries attempted per logical request on `TimedOut`/`ConnectionError`
    /// before the failure is surfaced (spec.md §4.1 default: 2).
    pub retry_attempts: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            update_interval_seconds: 5,
            timeout_seconds: 15,
            auto_reconnect: false,
            auto_reconnect_interval_seconds: 10,
            retry_attempts: 2,
        }
    }
}

/// Everything needed to connect to and poll one Transmission daemon.
///
/// Immutable for the lifetime of a connection: calling
/// [`crate::session::Session::reconfigure`] tears down the current
/// connection before the new configuration takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub address: String,
    pub port: u16,
    /// URL path the RPC endpoint is mounted at, e.g. `/transmission/rpc`.
    pub api_path: String,
    pub https: bool,
    pub proxy: Proxy,
    pub tls: TlsConfig,
    pub auth: Auth,
    pub timings: Timings,
}

impl ServerConfig {
    /// The full RPC endpoint URL, e.g. `http://host:9091/transmission/rpc`.
    pub fn rpc_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        let path = self.api_path.strip_prefix('/').unwrap_or(&self.api_path);
        format!("{scheme}://{}:{}/{path}", self.address, self.port)
    }
}
