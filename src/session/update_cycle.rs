//! Multi-phase update cycle: server settings, torrent list, server
//! stats, then any enabled per-torrent file/peer sub-fetches, converging
//! on a consistent snapshot before the next tick is scheduled (spec.md
//! §2, §4.4).

use serde_json::json;

use crate::models::{ServerSettings, ServerStats, Torrent};
use crate::reconciler::{self, ById, ReconcileReport};
use crate::rpc::fields::{
    TORRENT_FILES_FIELDS, TORRENT_GET_FIELDS, TORRENT_PEERS_FIELDS, TORRENT_SINGLE_FILE_FIELDS,
};
use crate::transport::{PostError, RequestFailure, RequestType, Transport};

/// What changed during one full update cycle, used by the orchestrator to
/// decide which signals to emit.
#[derive(Debug, Default)]
pub struct UpdateCycleReport {
    pub settings_changed: bool,
    pub stats_changed: bool,
    pub torrents: ReconcileReport,
    /// Ids of torrents newly appended this cycle (spec.md §4.4
    /// "torrent_added events").
    pub added_torrent_ids: Vec<i64>,
    /// Ids of torrents whose `is_finished` transitioned from false to true
    /// this cycle.
    pub finished_torrent_ids: Vec<i64>,
}

pub enum CycleError {
    Failed(RequestFailure),
    Cancelled,
}

impl From<PostError> for CycleError {
    fn from(value: PostError) -> Self {
        match value {
            PostError::Failed(failure) => Self::Failed(failure),
            PostError::Cancelled => Self::Cancelled,
        }
    }
}

/// Run one full cycle: `session-get`, `torrent-get` (full field set),
/// `session-stats`, then a scoped `torrent-get` for every torrent with
/// `files_enabled`/`peers_enabled` set.
pub async fn run(
    transport: &Transport,
    settings: &mut ServerSettings,
    stats: &mut ServerStats,
    torrents: &mut Vec<Torrent>,
) -> Result<UpdateCycleReport, CycleError> {
    let mut report = UpdateCycleReport::default();

    // The three base fetches are independent daemon calls; issue them
    // concurrently rather than waiting on each round trip in turn
    // (spec.md §4.4 update cycle: "issue ... concurrently").
    let (session, torrent_get, session_stats) = tokio::join!(
        transport.post("session-get", json!({}), RequestType::DataUpdate),
        transport.post(
            "torrent-get",
            json!({ "fields": TORRENT_GET_FIELDS }),
            RequestType::DataUpdate,
        ),
        transport.post("session-stats", json!({}), RequestType::DataUpdate),
    );

    let session = session?;
    if session.success {
        report.settings_changed = settings.update_from_json(&session.arguments);
    }

    let torrent_get = torrent_get?;
    let mut single_file_candidates: Vec<i64> = Vec::new();
    if torrent_get.success {
        let incoming: Vec<Torrent> = torrent_get
            .arguments
            .get("torrents")
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
            .map(Torrent::from_json)
            .collect();

        let mut finished_ids = Vec::new();
        let mut metadata_completed_ids = Vec::new();
        report.torrents = reconciler::reconcile(torrents, incoming, &ById, |old, new| {
            let was_metadata_complete = old.metadata_percent_complete >= 1.0;
            let was_finished = old.is_finished();
            let changed = copy_snapshot(old, new);
            if !was_metadata_complete && old.metadata_percent_complete >= 1.0 {
                metadata_completed_ids.push(old.id);
            }
            if !was_finished && old.is_finished() {
                finished_ids.push(old.id);
            }
            changed
        });
        report.finished_torrent_ids = finished_ids;
        single_file_candidates.extend(metadata_completed_ids);

        let added_start = torrents.len() - report.torrents.added;
        for torrent in &torrents[added_start..] {
            if torrent.metadata_percent_complete >= 1.0 {
                single_file_candidates.push(torrent.id);
            }
        }
        report.added_torrent_ids = torrents[added_start..].iter().map(|t| t.id).collect();
    }

    let session_stats = session_stats?;
    if session_stats.success {
        report.stats_changed = stats.update_from_json(&session_stats.arguments);
    }

    if !single_file_candidates.is_empty() {
        check_single_file(transport, torrents, &single_file_candidates).await?;
    }

    for torrent in torrents.iter_mut() {
        if torrent.files_enabled {
            fetch_files(transport, torrent).await?;
        }
        if torrent.peers_enabled {
            fetch_peers(transport, torrent).await?;
        }
    }

    Ok(report)
}

/// Resolves `is_single_file` for each candidate id (spec.md §4.4
/// "checkSingleFile").
async fn check_single_file(
    transport: &Transport,
    torrents: &mut [Torrent],
    ids: &[i64],
) -> Result<(), CycleError> {
    let reply = transport
        .post(
            "torrent-get",
            json!({ "ids": ids, "fields": TORRENT_SINGLE_FILE_FIELDS }),
            RequestType::DataUpdate,
        )
        .await?;
    if !reply.success {
        return Ok(());
    }
    let Some(entries) = reply.arguments.get("torrents").and_then(|v| v.as_array()) else {
        return Ok(());
    };
    for entry in entries {
        let Some(id) = entry.get("id").and_then(|v| v.as_i64()) else {
            continue;
        };
        if let Some(torrent) = torrents.iter_mut().find(|t| t.id == id) {
            torrent.apply_single_file_check(entry);
        }
    }
    Ok(())
}

async fn fetch_files(transport: &Transport, torrent: &mut Torrent) -> Result<(), CycleError> {
    let reply = transport
        .post(
            "torrent-get",
            json!({ "ids": [torrent.id], "fields": TORRENT_FILES_FIELDS }),
            RequestType::DataUpdate,
        )
        .await?;
    if let Some(entry) = first_torrent(&reply.arguments) {
        torrent.update_files_from_json(entry);
    }
    Ok(())
}

async fn fetch_peers(transport: &Transport, torrent: &mut Torrent) -> Result<(), CycleError> {
    let reply = transport
        .post(
            "torrent-get",
            json!({ "ids": [torrent.id], "fields": TORRENT_PEERS_FIELDS }),
            RequestType::DataUpdate,
        )
        .await?;
    if let Some(entry) = first_torrent(&reply.arguments) {
        torrent.update_peers_from_json(entry);
    }
    Ok(())
}

fn first_torrent(arguments: &serde_json::Value) -> Option<&serde_json::Value> {
    arguments.get("torrents")?.as_array()?.first()
}

/// `update_item` hook for the torrent reconciler: applies the freshly
/// parsed snapshot's fields onto the mirror entry without losing its
/// `files`/`trackers`/`peers` collections or sub-fetch flags.
fn copy_snapshot(old: &mut Torrent, new: &Torrent) -> bool {
    let mut changed = false;
    macro_rules! assign_field {
        ($field:ident) => {
            if old.$field != new.$field {
                old.$field = new.$field.clone();
                changed = true;
            }
        };
    }
    assign_field!(hash_string);
    assign_field!(name);
    assign_field!(download_dir);
    assign_field!(comment);
    assign_field!(creator);
    assign_field!(added_date);
    assign_field!(date_created);
    assign_field!(done_date);
    assign_field!(status);
    assign_field!(error);
    assign_field!(error_string);
    assign_field!(size_when_done);
    assign_field!(total_size);
    assign_field!(left_until_done);
    assign_field!(have_valid);
    assign_field!(downloaded_ever);
    assign_field!(uploaded_ever);
    assign_field!(percent_done);
    assign_field!(metadata_percent_complete);
    assign_field!(recheck_progress);
    assign_field!(eta);
    assign_field!(rate_download);
    assign_field!(rate_upload);
    assign_field!(download_limit);
    assign_field!(download_limited);
    assign_field!(upload_limit);
    assign_field!(upload_limited);
    assign_field!(honors_session_limits);
    assign_field!(bandwidth_priority);
    assign_field!(peer_limit);
    assign_field!(peers_connected);
    assign_field!(peers_getting_from_us);
    assign_field!(peers_sending_to_us);
    assign_field!(queue_position);
    assign_field!(seed_idle_limit);
    assign_field!(seed_idle_mode);
    assign_field!(seed_ratio_limit);
    assign_field!(seed_ratio_mode);
    assign_field!(upload_ratio);

    if !new.trackers.is_empty() {
        let report = reconciler::reconcile(
            &mut old.trackers,
            new.trackers.clone(),
            &crate::reconciler::ByTrackerId,
            copy_tracker,
        );
        changed |= report.is_not_empty();
    }

    changed
}

fn copy_tracker(old: &mut crate::models::Tracker, new: &crate::models::Tracker) -> bool {
    let mut changed = false;
    if old.announce != new.announce {
        old.announce = new.announce.clone();
        old.site = new.site.clone();
        changed = true;
    }
    if old.status != new.status {
        old.status = new.status;
        changed = true;
    }
    if old.error_message != new.error_message {
        old.error_message = new.error_message.clone();
        changed = true;
    }
    if old.next_update_time != new.next_update_time {
        old.next_update_time = new.next_update_time;
        changed = true;
    }
    if old.peers != new.peers {
        old.peers = new.peers;
        changed = true;
    }
    if old.seeders != new.seeders {
        old.seeders = new.seeders;
        changed = true;
    }
    if old.leechers != new.leechers {
        old.leechers = new.leechers;
        changed = true;
    }
    changed
}
