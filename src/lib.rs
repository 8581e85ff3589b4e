//! # transmission-mirror
//!
//! A client engine for the Transmission BitTorrent daemon's JSON-RPC
//! protocol. Maintains a live, incrementally-updated mirror of a remote
//! session: its global settings, aggregate statistics, and the set of
//! torrents, with optional per-torrent file/tracker/peer detail.
//!
//! The engine routes calls through a single HTTP transport
//! ([`transport::Transport`]) that handles Transmission's stateful
//! `X-Transmission-Session-Id` challenge, request retries, TLS trust
//! customization, and HTTP basic auth; drives a periodic multi-phase
//! update cycle; reconciles the remote torrent list against the local
//! mirror with batched add/change/remove notifications
//! ([`reconciler`]); and manages connection lifecycle through a
//! three-state machine with an optional auto-reconnect backoff
//! ([`session::Session`]).
//!
//! # Example
//!
//! ```no_run
//! use transmission_mirror::config::{Auth, ServerConfig, TlsConfig, Timings, Proxy};
//! use transmission_mirror::session::Session;
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = Session::spawn();
//!     session
//!         .reconfigure(ServerConfig {
//!             name: "home".into(),
//!             address: "127.0.0.1".into(),
//!             port: 9091,
//!             api_path: "/transmission/rpc".into(),
//!             https: false,
//!             proxy: Proxy::Default,
//!             tls: TlsConfig::default(),
//!             auth: Auth::default(),
//!             timings: Timings::default(),
//!         })
//!         .await;
//!     session.connect().await;
//!
//!     let mut status = session.status();
//!     status.changed().await.ok();
//!     println!("{:?}", *status.borrow());
//! }
//! ```

/// Server configuration accepted by the session orchestrator.
pub mod config;
/// Error taxonomy and long-form error detail composition.
pub mod error;
/// Data object models: Server Settings, Server Stats, Torrent, Torrent
/// File, Tracker, Peer.
pub mod models;
/// Locality detection: is the configured server this host?
pub mod net;
/// Write-operation parameter objects.
pub mod parameters;
/// Generic list reconciliation used to diff torrent/file/tracker/peer
/// collections against a fresh RPC snapshot.
pub mod reconciler;
/// Wire shaping for the Transmission JSON-RPC protocol.
pub mod rpc;
/// The top-level session state machine.
pub mod session;
/// Tracker site derivation.
pub mod site;
/// HTTP transport: request routing, retries, and TLS configuration.
pub mod transport;

pub use error::{Error, ErrorKind};
pub use session::Session;
