//! Mirror of the daemon's `session-get` reply (spec.md §3 "Server settings
//! snapshot").

use super::{as_bool, as_f64, as_i64, as_string, assign};

/// Mirror of the current daemon session settings.
///
/// Invariant: after every successful `session-get`, this mirror equals the
/// daemon's reply, and `minimum_rpc_version <= rpc_version` holds for any
/// daemon this client has completed the version handshake with (spec.md
/// §3, §4.4).
///
/// Setters on the orchestrator (`session-set`) may optimistically update
/// this mirror before the write is posted; a failed post does not roll the
/// optimistic edit back (spec.md §9, Open Question — source behavior kept).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerSettings {
    pub rpc_version: i64,
    pub minimum_rpc_version: i64,
    pub version: String,
    pub download_dir: String,
    pub incomplete_dir: String,
    pub incomplete_dir_enabled: bool,
    pub speed_limit_down: i64,
    pub speed_limit_down_enabled: bool,
    pub speed_limit_up: i64,
    pub speed_limit_up_enabled: bool,
    pub alt_speed_down: i64,
    pub alt_speed_up: i64,
    pub alt_speed_enabled: bool,
    pub alt_speed_time_enabled: bool,
    pub alt_speed_time_begin: i64,
    pub alt_speed_time_end: i64,
    pub peer_port: i64,
    pub peer_port_random_on_start: bool,
    pub port_forwarding_enabled: bool,
    pub pex_enabled: bool,
    pub dht_enabled: bool,
    pub lpd_enabled: bool,
    pub utp_enabled: bool,
    pub encryption: String,
    pub download_queue_enabled: bool,
    pub download_queue_size: i64,
    pub seed_queue_enabled: bool,
    pub seed_queue_size: i64,
    pub seed_ratio_limit: f64,
    pub seed_ratio_limited: bool,
    pub idle_seeding_limit: i64,
    pub idle_seeding_limit_enabled: bool,
    pub start_added_torrents: bool,
    pub trash_original_torrent_files: bool,
    pub rename_partial_files: bool,
    pub download_dir_free_space: i64,
}

impl ServerSettings {
    /// Apply a `session-get` (or `session-set` echo) reply, returning
    /// whether any field changed.
    pub fn update_from_json(&mut self, value: &serde_json::Value) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.rpc_version, as_i64(value, "rpc-version"));
        changed |= assign(
            &mut self.minimum_rpc_version,
            as_i64(value, "rpc-version-minimum"),
        );
        changed |= assign(&mut self.version, as_string(value, "version"));
        changed |= assign(&mut self.download_dir, as_string(value, "download-dir"));
        changed |= assign(
            &mut self.incomplete_dir,
            as_string(value, "incomplete-dir"),
        );
        changed |= assign(
            &mut self.incomplete_dir_enabled,
            as_bool(value, "incomplete-dir-enabled"),
        );
        changed |= assign(
            &mut self.speed_limit_down,
            as_i64(value, "speed-limit-down"),
        );
        changed |= assign(
            &mut self.speed_limit_down_enabled,
            as_bool(value, "speed-limit-down-enabled"),
        );
        changed |= assign(&mut self.speed_limit_up, as_i64(value, "speed-limit-up"));
        changed |= assign(
            &mut self.speed_limit_up_enabled,
            as_bool(value, "speed-limit-up-enabled"),
        );
        changed |= assign(&mut self.alt_speed_down, as_i64(value, "alt-speed-down"));
        changed |= assign(&mut self.alt_speed_up, as_i64(value, "alt-speed-up"));
        changed |= assign(
            &mut self.alt_speed_enabled,
            as_bool(value, "alt-speed-enabled"),
        );
        changed |= assign(
            &mut self.alt_speed_time_enabled,
            as_bool(value, "alt-speed-time-enabled"),
        );
        changed |= assign(
            &mut self.alt_speed_time_begin,
            as_i64(value, "alt-speed-time-begin"),
        );
        changed |= assign(
            &mut self.alt_speed_time_end,
            as_i64(value, "alt-speed-time-end"),
        );
        changed |= assign(&mut self.peer_port, as_i64(value, "peer-port"));
        changed |= assign(
            &mut self.peer_port_random_on_start,
            as_bool(value, "peer-port-random-on-start"),
        );
        changed |= assign(
            &mut self.port_forwarding_enabled,
            as_bool(value, "port-forwarding-enabled"),
        );
        changed |= assign(&mut self.pex_enabled, as_bool(value, "pex-enabled"));
        changed |= assign(&mut self.dht_enabled, as_bool(value, "dht-enabled"));
        changed |= assign(&mut self.lpd_enabled, as_bool(value, "lpd-enabled"));
        changed |= assign(&mut self.utp_enabled, as_bool(value, "utp-enabled"));
        changed |= assign(&mut self.encryption, as_string(value, "encryption"));
        changed |= assign(
            &mut self.download_queue_enabled,
            as_bool(value, "download-queue-enabled"),
        );
        changed |= assign(
            &mut self.download_queue_size,
            as_i64(value, "download-queue-size"),
        );
        changed |= assign(
            &mut self.seed_queue_enabled,
            as_bool(value, "seed-queue-enabled"),
        );
        changed |= assign(
            &mut self.seed_queue_size,
            as_i64(value, "seed-queue-size"),
        );
        changed |= assign(
            &mut self.seed_ratio_limit,
            as_f64(value, "seedRatioLimit"),
        );
        changed |= assign(
            &mut self.seed_ratio_limited,
            as_bool(value, "seedRatioLimited"),
        );
        changed |= assign(
            &mut self.idle_seeding_limit,
            as_i64(value, "idle-seeding-limit"),
        );
        changed |= assign(
            &mut self.idle_seeding_limit_enabled,
            as_bool(value, "idle-seeding-limit-enabled"),
        );
        changed |= assign(
            &mut self.start_added_torrents,
            as_bool(value, "start-added-torrents"),
        );
        changed |= assign(
            &mut self.trash_original_torrent_files,
            as_bool(value, "trash-original-torrent-files"),
        );
        changed |= assign(
            &mut self.rename_partial_files,
            as_bool(value, "rename-partial-files"),
        );
        if let Some(free_space) = value.get("download-dir-free-space") {
            changed |= assign(
                &mut self.download_dir_free_space,
                free_space.as_f64().unwrap_or(0.0) as i64,
            );
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_update_reports_changed() {
        let mut settings = ServerSettings::default();
        let changed = settings.update_from_json(&json!({
            "rpc-version": 17,
            "rpc-version-minimum": 1,
            "download-dir": "/downloads",
        }));
        assert!(changed);
        assert_eq!(settings.rpc_version, 17);
        assert_eq!(settings.minimum_rpc_version, 1);
        assert_eq!(settings.download_dir, "/downloads");
    }

    #[test]
    fn identical_update_reports_no_change() {
        let mut settings = ServerSettings::default();
        let payload = json!({ "rpc-version": 17, "rpc-version-minimum": 1 });
        assert!(settings.update_from_json(&payload));
        assert!(!settings.update_from_json(&payload));
    }
}
