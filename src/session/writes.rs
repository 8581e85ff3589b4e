//! Write operations (spec.md §6 method list). Each posts one RPC and
//! reports whether the daemon accepted it; a non-success reply is
//! interpreted as the operation having silently had no effect rather than
//! an engine-level failure (spec.md §7).

use serde_json::{Value, json};

use crate::transport::{PostError, RequestType, Transport};

async fn call(transport: &Transport, method: &str, arguments: Value) -> Result<bool, PostError> {
    let reply = transport.post(method, arguments, RequestType::Independent).await?;
    Ok(reply.success)
}

pub async fn torrent_set(transport: &Transport, ids: &[i64], fields: Value) -> Result<bool, PostError> {
    let mut arguments = fields;
    arguments["ids"] = json!(ids);
    call(transport, "torrent-set", arguments).await
}

pub async fn torrent_start(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "torrent-start", json!({ "ids": ids })).await
}

pub async fn torrent_start_now(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "torrent-start-now", json!({ "ids": ids })).await
}

pub async fn torrent_stop(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "torrent-stop", json!({ "ids": ids })).await
}

pub async fn torrent_verify(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "torrent-verify", json!({ "ids": ids })).await
}

pub async fn torrent_reannounce(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "torrent-reannounce", json!({ "ids": ids })).await
}

pub async fn torrent_remove(
    transport: &Transport,
    ids: &[i64],
    delete_local_data: bool,
) -> Result<bool, PostError> {
    call(
        transport,
        "torrent-remove",
        json!({ "ids": ids, "delete-local-data": delete_local_data }),
    )
    .await
}

pub async fn torrent_set_location(
    transport: &Transport,
    ids: &[i64],
    location: &str,
    move_data: bool,
) -> Result<bool, PostError> {
    call(
        transport,
        "torrent-set-location",
        json!({ "ids": ids, "location": location, "move": move_data }),
    )
    .await
}

pub async fn torrent_rename_path(
    transport: &Transport,
    id: i64,
    path: &str,
    name: &str,
) -> Result<bool, PostError> {
    call(
        transport,
        "torrent-rename-path",
        json!({ "ids": [id], "path": path, "name": name }),
    )
    .await
}

pub async fn queue_move_top(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "queue-move-top", json!({ "ids": ids })).await
}

pub async fn queue_move_up(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "queue-move-up", json!({ "ids": ids })).await
}

pub async fn queue_move_down(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "queue-move-down", json!({ "ids": ids })).await
}

pub async fn queue_move_bottom(transport: &Transport, ids: &[i64]) -> Result<bool, PostError> {
    call(transport, "queue-move-bottom", json!({ "ids": ids })).await
}

/// Posts `session-set`. The settings mirror is not touched here; it only
/// catches up on the next `session-get` in the update cycle, so a change
/// is invisible until then regardless of whether this call succeeds
/// (spec.md §3, §9 Open Question — see DESIGN.md).
pub async fn session_set(transport: &Transport, changes: Value) -> Result<bool, PostError> {
    call(transport, "session-set", changes).await
}

/// Posts `free-space` and extracts `size-bytes` from a successful reply.
pub async fn free_space(transport: &Transport, path: &str) -> Result<Option<i64>, PostError> {
    let reply = transport
        .post("free-space", json!({ "path": path }), RequestType::Independent)
        .await?;
    if !reply.success {
        return Ok(None);
    }
    Ok(reply.arguments.get("size-bytes").and_then(|v| v.as_f64()).map(|v| v as i64))
}

/// Posts `session-close`, telling the daemon this client is going away.
/// Best-effort: the engine disconnects locally regardless of the reply.
pub async fn session_close(transport: &Transport) -> Result<bool, PostError> {
    call(transport, "session-close", json!({})).await
}

/// Posts `session-get` scoped to `download-dir-free-space`, distinct from
/// [`free_space`] which asks about an arbitrary path (spec.md §6).
pub async fn download_dir_free_space(transport: &Transport) -> Result<Option<i64>, PostError> {
    let reply = transport
        .post(
            "session-get",
            json!({ "fields": ["download-dir-free-space"] }),
            RequestType::Independent,
        )
        .await?;
    if !reply.success {
        return Ok(None);
    }
    Ok(reply
        .arguments
        .get("download-dir-free-space")
        .and_then(|v| v.as_f64())
        .map(|v| v as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torrent_set_merges_ids_into_caller_fields() {
        let mut arguments = json!({ "downloadLimit": 100 });
        arguments["ids"] = json!([1, 2]);
        assert_eq!(arguments["downloadLimit"], 100);
        assert_eq!(arguments["ids"][0], 1);
    }
}
