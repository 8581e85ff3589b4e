//! Version negotiation performed once per connection attempt (spec.md
//! §4.4, §7, §8 invariant 7).

use crate::models::ServerSettings;
use crate::transport::{PostError, RequestFailure, RequestType, Transport};

/// The minimum `rpc-version` this client understands (spec.md §8: "for
/// every `(client_min=14, ...)`").
pub const CLIENT_MIN_RPC_VERSION: i64 = 14;

pub enum HandshakeOutcome {
    Connected(ServerSettings),
    ServerIsTooOld,
    ServerIsTooNew,
    Failed(RequestFailure),
    Cancelled,
}

/// Issue `session-get` and classify the reply against
/// [`CLIENT_MIN_RPC_VERSION`] (spec.md §8 invariant 7: the engine reaches
/// `Connected` iff `server_min <= client_min AND server_rpc >= client_min`).
pub async fn negotiate(transport: &Transport) -> HandshakeOutcome {
    let reply = transport
        .post("session-get", serde_json::json!({}), RequestType::Independent)
        .await;

    let response = match reply {
        Ok(response) => response,
        Err(PostError::Failed(failure)) => return HandshakeOutcome::Failed(failure),
        Err(PostError::Cancelled) => return HandshakeOutcome::Cancelled,
    };

    if !response.success {
        return HandshakeOutcome::Failed(RequestFailure {
            kind: crate::error::ErrorKind::ConnectionError,
            message: "session-get did not succeed".into(),
            detailed_message: String::new(),
        });
    }

    let mut settings = ServerSettings::default();
    settings.update_from_json(&response.arguments);

    if settings.rpc_version < CLIENT_MIN_RPC_VERSION {
        return HandshakeOutcome::ServerIsTooOld;
    }
    if settings.minimum_rpc_version > CLIENT_MIN_RPC_VERSION {
        return HandshakeOutcome::ServerIsTooNew;
    }

    HandshakeOutcome::Connected(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_rpc_version_matches_scenario_s1() {
        assert_eq!(CLIENT_MIN_RPC_VERSION, 14);
    }
}
