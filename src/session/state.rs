//! Connection lifecycle state (spec.md §4.4 state machine, §3 "Connection
//! status").

use crate::error::ErrorKind;

/// The orchestrator's three-state connection machine (spec.md §4.4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Connection status snapshot, broadcast via `watch` (spec.md §3).
///
/// Invariant: `error != ErrorKind::NoError` only while `state` is, or is
/// transitioning to, `Disconnected`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub state: ConnectionState,
    pub error: ErrorKind,
    pub error_message: String,
    pub detailed_error_message: String,
}

impl Status {
    pub fn connecting() -> Self {
        Self {
            state: ConnectionState::Connecting,
            ..Self::default()
        }
    }

    pub fn connected() -> Self {
        Self {
            state: ConnectionState::Connected,
            ..Self::default()
        }
    }

    pub fn disconnected(error: ErrorKind, message: impl Into<String>, detailed: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            error,
            error_message: message.into(),
            detailed_error_message: detailed.into(),
        }
    }
}
