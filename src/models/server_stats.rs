//! Mirror of the daemon's `session-stats` reply (spec.md §3 "Server stats").

use super::{as_i64, assign};

/// One `{downloaded, uploaded, duration, session_count}` block, used for
/// both the current-session and cumulative stats (spec.md §3).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStatsSnapshot {
    pub downloaded_bytes: i64,
    pub uploaded_bytes: i64,
    pub duration_seconds: i64,
    pub session_count: i64,
}

impl SessionStatsSnapshot {
    fn update_from_json(&mut self, value: &serde_json::Value) -> bool {
        let mut changed = false;
        changed |= assign(
            &mut self.downloaded_bytes,
            as_i64(value, "downloadedBytes"),
        );
        changed |= assign(&mut self.uploaded_bytes, as_i64(value, "uploadedBytes"));
        changed |= assign(&mut self.duration_seconds, as_i64(value, "secondsActive"));
        changed |= assign(&mut self.session_count, as_i64(value, "sessionCount"));
        changed
    }
}

/// Download/upload speeds and current-session/cumulative stat blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServerStats {
    pub download_speed: i64,
    pub upload_speed: i64,
    pub current_session: SessionStatsSnapshot,
    pub cumulative: SessionStatsSnapshot,
}

impl ServerStats {
    /// Apply a `session-stats` reply, returning whether any field changed.
    pub fn update_from_json(&mut self, value: &serde_json::Value) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.download_speed, as_i64(value, "downloadSpeed"));
        changed |= assign(&mut self.upload_speed, as_i64(value, "uploadSpeed"));
        if let Some(current) = value.get("current-stats") {
            changed |= self.current_session.update_from_json(current);
        }
        if let Some(cumulative) = value.get("cumulative-stats") {
            changed |= self.cumulative.update_from_json(cumulative);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_stat_blocks() {
        let mut stats = ServerStats::default();
        let changed = stats.update_from_json(&json!({
            "downloadSpeed": 1000,
            "uploadSpeed": 200,
            "current-stats": {
                "downloadedBytes": 10,
                "uploadedBytes": 5,
                "secondsActive": 60,
                "sessionCount": 1,
            },
            "cumulative-stats": {
                "downloadedBytes": 1000,
                "uploadedBytes": 500,
                "secondsActive": 3600,
                "sessionCount": 4,
            },
        }));
        assert!(changed);
        assert_eq!(stats.current_session.downloaded_bytes, 10);
        assert_eq!(stats.cumulative.session_count, 4);
    }
}
