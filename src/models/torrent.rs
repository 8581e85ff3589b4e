//! A torrent and its secondary collections (spec.md §3 "Torrent").

use super::{EnumMapper, Peer, TorrentFile, Tracker, as_bool, as_f64, as_i64, as_string, assign};
use crate::reconciler::{self, ByAddress, ById, ByTrackerId};

/// Daemon `status` integers 0..6 (spec.md §6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TorrentStatus {
    #[default]
    Stopped,
    QueuedToVerify,
    Verifying,
    QueuedToDownload,
    Downloading,
    QueuedToSeed,
    Seeding,
}

const STATUS_TABLE: [(i64, TorrentStatus); 7] = [
    (0, TorrentStatus::Stopped),
    (1, TorrentStatus::QueuedToVerify),
    (2, TorrentStatus::Verifying),
    (3, TorrentStatus::QueuedToDownload),
    (4, TorrentStatus::Downloading),
    (5, TorrentStatus::QueuedToSeed),
    (6, TorrentStatus::Seeding),
];

/// A torrent and the secondary collections owned by it (spec.md §3).
///
/// `id` is stable only within a connection's lifetime; `hash_string` is
/// the cross-session-stable identity. `files_enabled`/`peers_enabled`
/// gate whether the orchestrator schedules the matching per-torrent
/// sub-fetch each update cycle (spec.md §4.4).
#[derive(Debug, Clone, PartialEq)]
pub struct Torrent {
    pub id: i64,
    pub hash_string: String,

    pub name: String,
    pub download_dir: String,
    pub comment: String,
    pub creator: String,
    pub added_date: i64,
    pub date_created: i64,
    pub done_date: i64,

    pub status: TorrentStatus,
    pub error: i64,
    pub error_string: String,

    pub size_when_done: i64,
    pub total_size: i64,
    pub left_until_done: i64,
    pub have_valid: i64,
    pub downloaded_ever: i64,
    pub uploaded_ever: i64,
    pub percent_done: f64,
    pub metadata_percent_complete: f64,
    pub recheck_progress: f64,
    pub eta: i64,

    pub rate_download: i64,
    pub rate_upload: i64,
    pub download_limit: i64,
    pub download_limited: bool,
    pub upload_limit: i64,
    pub upload_limited: bool,
    pub honors_session_limits: bool,
    pub bandwidth_priority: i64,

    pub peer_limit: i64,
    pub peers_connected: i64,
    pub peers_getting_from_us: i64,
    pub peers_sending_to_us: i64,

    pub queue_position: i64,
    pub seed_idle_limit: i64,
    pub seed_idle_mode: i64,
    pub seed_ratio_limit: f64,
    pub seed_ratio_mode: i64,
    pub upload_ratio: f64,

    pub files: Vec<TorrentFile>,
    pub trackers: Vec<Tracker>,
    pub peers: Vec<Peer>,

    pub files_enabled: bool,
    pub peers_enabled: bool,
    files_fetched: bool,
    peers_fetched: bool,

    /// Whether this torrent has exactly one file, resolved by a follow-up
    /// `["id","priorities"]` fetch once its metadata completes (spec.md
    /// §4.4 "checkSingleFile"). `None` until that fetch runs.
    pub is_single_file: Option<bool>,
}

impl Torrent {
    /// Build a new torrent from its first `torrent-get` element.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut torrent = Self {
            id: 0,
            hash_string: String::new(),
            name: String::new(),
            download_dir: String::new(),
            comment: String::new(),
            creator: String::new(),
            added_date: 0,
            date_created: 0,
            done_date: 0,
            status: TorrentStatus::Stopped,
            error: 0,
            error_string: String::new(),
            size_when_done: 0,
            total_size: 0,
            left_until_done: 0,
            have_valid: 0,
            downloaded_ever: 0,
            uploaded_ever: 0,
            percent_done: 0.0,
            metadata_percent_complete: 0.0,
            recheck_progress: 0.0,
            eta: 0,
            rate_download: 0,
            rate_upload: 0,
            download_limit: 0,
            download_limited: false,
            upload_limit: 0,
            upload_limited: false,
            honors_session_limits: false,
            bandwidth_priority: 0,
            peer_limit: 0,
            peers_connected: 0,
            peers_getting_from_us: 0,
            peers_sending_to_us: 0,
            queue_position: 0,
            seed_idle_limit: 0,
            seed_idle_mode: 0,
            seed_ratio_limit: 0.0,
            seed_ratio_mode: 0,
            upload_ratio: 0.0,
            files: Vec::new(),
            trackers: Vec::new(),
            peers: Vec::new(),
            files_enabled: false,
            peers_enabled: false,
            files_fetched: false,
            peers_fetched: false,
            is_single_file: None,
        };
        torrent.update_from_json(value);
        torrent
    }

    /// Whether the daemon reports this torrent as fully downloaded.
    pub fn is_finished(&self) -> bool {
        self.left_until_done == 0
    }

    /// Apply a `["id","priorities"]` follow-up fetch (spec.md §4.4
    /// "checkSingleFile"): a torrent with exactly one priority entry has
    /// exactly one file.
    pub fn apply_single_file_check(&mut self, value: &serde_json::Value) {
        if let Some(priorities) = value.get("priorities").and_then(|v| v.as_array()) {
            self.is_single_file = Some(priorities.len() == 1);
        }
    }

    /// Apply one `torrent-get` element covering the full field set
    /// (`TORRENT_GET_FIELDS`, spec.md §6), returning whether anything
    /// changed. Also folds in the `trackerStats` array via the list
    /// reconciler.
    pub fn update_from_json(&mut self, value: &serde_json::Value) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.id, as_i64(value, "id"));
        changed |= assign(&mut self.hash_string, as_string(value, "hashString"));
        changed |= assign(&mut self.name, as_string(value, "name"));
        changed |= assign(&mut self.download_dir, as_string(value, "downloadDir"));
        changed |= assign(&mut self.comment, as_string(value, "comment"));
        changed |= assign(&mut self.creator, as_string(value, "creator"));
        changed |= assign(&mut self.added_date, as_i64(value, "addedDate"));
        changed |= assign(&mut self.date_created, as_i64(value, "dateCreated"));
        changed |= assign(&mut self.done_date, as_i64(value, "doneDate"));

        if let Some(raw) = value.get("status").and_then(|v| v.as_f64()) {
            changed |= assign(
                &mut self.status,
                EnumMapper::from_i64(raw as i64, &STATUS_TABLE, "torrent.status"),
            );
        }
        changed |= assign(&mut self.error, as_i64(value, "error"));
        changed |= assign(&mut self.error_string, as_string(value, "errorString"));

        changed |= assign(&mut self.size_when_done, as_i64(value, "sizeWhenDone"));
        changed |= assign(&mut self.total_size, as_i64(value, "totalSize"));
        changed |= assign(&mut self.left_until_done, as_i64(value, "leftUntilDone"));
        changed |= assign(&mut self.have_valid, as_i64(value, "haveValid"));
        changed |= assign(&mut self.downloaded_ever, as_i64(value, "downloadedEver"));
        changed |= assign(&mut self.uploaded_ever, as_i64(value, "uploadedEver"));
        changed |= assign(&mut self.percent_done, as_f64(value, "percentDone"));
        changed |= assign(
            &mut self.metadata_percent_complete,
            as_f64(value, "metadataPercentComplete"),
        );
        changed |= assign(&mut self.recheck_progress, as_f64(value, "recheckProgress"));
        changed |= assign(&mut self.eta, as_i64(value, "eta"));

        changed |= assign(&mut self.rate_download, as_i64(value, "rateDownload"));
        changed |= assign(&mut self.rate_upload, as_i64(value, "rateUpload"));
        changed |= assign(&mut self.download_limit, as_i64(value, "downloadLimit"));
        changed |= assign(&mut self.download_limited, as_bool(value, "downloadLimited"));
        changed |= assign(&mut self.upload_limit, as_i64(value, "uploadLimit"));
        changed |= assign(&mut self.upload_limited, as_bool(value, "uploadLimited"));
        changed |= assign(
            &mut self.honors_session_limits,
            as_bool(value, "honorsSessionLimits"),
        );
        changed |= assign(
            &mut self.bandwidth_priority,
            as_i64(value, "bandwidthPriority"),
        );

        changed |= assign(&mut self.peer_limit, as_i64(value, "peer-limit"));
        changed |= assign(&mut self.peers_connected, as_i64(value, "peersConnected"));
        changed |= assign(
            &mut self.peers_getting_from_us,
            as_i64(value, "peersGettingFromUs"),
        );
        changed |= assign(
            &mut self.peers_sending_to_us,
            as_i64(value, "peersSendingToUs"),
        );

        changed |= assign(&mut self.queue_position, as_i64(value, "queuePosition"));
        changed |= assign(&mut self.seed_idle_limit, as_i64(value, "seedIdleLimit"));
        changed |= assign(&mut self.seed_idle_mode, as_i64(value, "seedIdleMode"));
        changed |= assign(&mut self.seed_ratio_limit, as_f64(value, "seedRatioLimit"));
        changed |= assign(&mut self.seed_ratio_mode, as_i64(value, "seedRatioMode"));
        changed |= assign(&mut self.upload_ratio, as_f64(value, "uploadRatio"));

        if let Some(tracker_stats) = value.get("trackerStats").and_then(|v| v.as_array()) {
            let incoming: Vec<Tracker> = tracker_stats.iter().map(Tracker::from_json).collect();
            let report =
                reconciler::reconcile(&mut self.trackers, incoming, &ByTrackerId, copy_tracker);
            changed |= report.is_not_empty();
        }

        changed
    }

    /// Apply a `torrent-get` reply scoped to `files`/`fileStats` fields.
    pub fn update_files_from_json(&mut self, value: &serde_json::Value) -> bool {
        let names = value.get("files").and_then(|v| v.as_array());
        let stats = value.get("fileStats").and_then(|v| v.as_array());
        let Some(names) = names else {
            return false;
        };
        let incoming: Vec<TorrentFile> = names
            .iter()
            .enumerate()
            .map(|(id, entry)| {
                let mut file = TorrentFile::from_json(id, entry);
                if let Some(stat) = stats.and_then(|s| s.get(id)) {
                    file.update_from_json(stat);
                }
                file
            })
            .collect();
        let report = reconciler::reconcile(&mut self.files, incoming, &ById, copy_file);
        self.files_fetched = true;
        report.is_not_empty()
    }

    /// Apply a `torrent-get` reply scoped to the `peers` field.
    pub fn update_peers_from_json(&mut self, value: &serde_json::Value) -> bool {
        let Some(peers) = value.get("peers").and_then(|v| v.as_array()) else {
            return false;
        };
        let incoming: Vec<Peer> = peers.iter().map(Peer::from_json).collect();
        let report = reconciler::reconcile(&mut self.peers, incoming, &ByAddress, copy_peer);
        self.peers_fetched = true;
        report.is_not_empty()
    }

    /// True once the latest full snapshot has been applied and any
    /// sub-fetch enabled for this torrent has completed at least once
    /// (spec.md §4.2).
    pub fn is_updated(&self) -> bool {
        (!self.files_enabled || self.files_fetched) && (!self.peers_enabled || self.peers_fetched)
    }
}

/// Copies an already-parsed replacement `Tracker` into `old` field by
/// field, used as the reconciler's `update_item` hook since incoming
/// trackers are parsed once up front rather than carried as raw JSON.
fn copy_tracker(old: &mut Tracker, new: &Tracker) -> bool {
    let mut changed = false;
    changed |= assign(&mut old.announce, new.announce.clone());
    changed |= assign(&mut old.site, new.site.clone());
    changed |= assign(&mut old.status, new.status);
    changed |= assign(&mut old.error_message, new.error_message.clone());
    changed |= assign(&mut old.next_update_time, new.next_update_time);
    changed |= assign(&mut old.peers, new.peers);
    changed |= assign(&mut old.seeders, new.seeders);
    changed |= assign(&mut old.leechers, new.leechers);
    changed
}

fn copy_file(old: &mut TorrentFile, new: &TorrentFile) -> bool {
    let mut changed = false;
    changed |= assign(&mut old.path, new.path.clone());
    changed |= assign(&mut old.size, new.size);
    changed |= assign(&mut old.completed_size, new.completed_size);
    changed |= assign(&mut old.priority, new.priority);
    changed |= assign(&mut old.wanted, new.wanted);
    changed
}

fn copy_peer(old: &mut Peer, new: &Peer) -> bool {
    let mut changed = false;
    changed |= assign(&mut old.client, new.client.clone());
    changed |= assign(&mut old.download_speed, new.download_speed);
    changed |= assign(&mut old.upload_speed, new.upload_speed);
    changed |= assign(&mut old.progress, new.progress);
    changed |= assign(&mut old.flags, new.flags.clone());
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_maps_known_values() {
        let torrent = Torrent::from_json(&json!({ "id": 1, "status": 4 }));
        assert_eq!(torrent.status, TorrentStatus::Downloading);
    }

    #[test]
    fn is_updated_requires_enabled_subfetches() {
        let mut torrent = Torrent::from_json(&json!({ "id": 1 }));
        torrent.files_enabled = true;
        assert!(!torrent.is_updated());
        torrent.update_files_from_json(&json!({ "files": [], "fileStats": [] }));
        assert!(torrent.is_updated());
    }

    #[test]
    fn is_updated_true_when_no_subfetches_enabled() {
        let torrent = Torrent::from_json(&json!({ "id": 1 }));
        assert!(torrent.is_updated());
    }
}
