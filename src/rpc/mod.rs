//! Wire shaping for the Transmission JSON-RPC protocol: request bodies and
//! response envelopes. The transport owns transport concerns (retries,
//! session id, TLS); this module only knows the `{"method", "arguments"}` /
//! `{"arguments", "result"}` shapes (spec.md §4.1, §6).

pub mod fields;

use serde_json::{Value, json};

/// Build the `{"method": ..., "arguments": ...}` request body for one RPC
/// call (spec.md §4.1).
pub fn build_request(method: &str, arguments: Value) -> Value {
    json!({
        "method": method,
        "arguments": arguments,
    })
}

/// A successfully-parsed daemon reply envelope.
///
/// `success` mirrors the daemon's `result == "success"` field exactly
/// (spec.md §4.1); non-success replies are still delivered to the caller,
/// not translated into a transport-level error.
#[derive(Debug, Clone)]
pub struct RpcResponse {
    pub arguments: Value,
    pub success: bool,
}

impl RpcResponse {
    /// Parse a raw JSON body as a Transmission RPC reply envelope. Returns
    /// `None` when the body isn't a JSON object or is missing `result`,
    /// which the transport maps to a `ParseError` (spec.md §7).
    pub fn parse(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let result = object.get("result")?.as_str()?;
        let arguments = object.get("arguments").cloned().unwrap_or(Value::Null);
        Some(Self {
            arguments,
            success: result == "success",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_request_shapes_method_and_arguments() {
        let body = build_request("torrent-get", json!({ "fields": ["id"] }));
        assert_eq!(body["method"], "torrent-get");
        assert_eq!(body["arguments"]["fields"][0], "id");
    }

    #[test]
    fn parse_recognizes_success_result() {
        let reply = RpcResponse::parse(&json!({ "result": "success", "arguments": { "a": 1 } }))
            .unwrap();
        assert!(reply.success);
        assert_eq!(reply.arguments["a"], 1);
    }

    #[test]
    fn parse_recognizes_failure_result() {
        let reply =
            RpcResponse::parse(&json!({ "result": "no such torrent", "arguments": {} })).unwrap();
        assert!(!reply.success);
    }

    #[test]
    fn parse_rejects_malformed_body() {
        assert!(RpcResponse::parse(&json!({ "no_result": true })).is_none());
        assert!(RpcResponse::parse(&json!("not an object")).is_none());
    }
}
