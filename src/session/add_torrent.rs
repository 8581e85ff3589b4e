//! `torrent-add` flow, including duplicate detection (spec.md §6, §8
//! scenario S6: a duplicate reply must not trigger a full `update_data()`).

use crate::parameters::AddTorrentParams;
use crate::transport::{PostError, RequestType, Transport};

/// Outcome of one `torrent-add` call.
pub enum AddTorrentOutcome {
    /// A new torrent was added; the torrent id from the `torrent-added`
    /// payload, if present.
    Added(Option<i64>),
    /// The daemon recognized this as an already-present torrent
    /// (`torrent-duplicate` in the reply) — no mirror update follows.
    Duplicate(Option<i64>),
    /// `torrent-add` returned `result != "success"`.
    Rejected,
}

pub async fn add_torrent(
    transport: &Transport,
    params: &AddTorrentParams,
) -> Result<AddTorrentOutcome, PostError> {
    let reply = transport
        .post("torrent-add", params.to_arguments(), RequestType::Independent)
        .await?;

    if !reply.success {
        return Ok(AddTorrentOutcome::Rejected);
    }

    if let Some(duplicate) = reply.arguments.get("torrent-duplicate") {
        return Ok(AddTorrentOutcome::Duplicate(extract_id(duplicate)));
    }

    let added = reply.arguments.get("torrent-added");
    Ok(AddTorrentOutcome::Added(added.and_then(extract_id)))
}

fn extract_id(value: &serde_json::Value) -> Option<i64> {
    value.get("id").and_then(|v| v.as_f64()).map(|v| v as i64)
}
