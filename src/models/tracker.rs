//! One entry in a torrent's tracker set (spec.md §3 "Tracker").

use crate::site;

use super::{EnumMapper, as_bool, as_i64, as_string, assign};

/// Announce status, mapped from the daemon's `announceState` integers 0..3
/// (spec.md §3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackerStatus {
    #[default]
    Inactive,
    WaitingForUpdate,
    QueuedForUpdate,
    Updating,
}

const STATUS_TABLE: [(i64, TrackerStatus); 4] = [
    (0, TrackerStatus::Inactive),
    (1, TrackerStatus::WaitingForUpdate),
    (2, TrackerStatus::QueuedForUpdate),
    (3, TrackerStatus::Updating),
];

/// A tracker as reported in a torrent's `trackerStats` array.
///
/// Invariant: `seeders`/`leechers` are clamped to `>= 0` (the daemon can
/// report `-1` meaning "unknown"). `error_message` is non-empty iff the
/// last announce failed and has actually happened (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Tracker {
    pub id: i64,
    pub announce: String,
    pub site: String,
    pub status: TrackerStatus,
    pub error_message: String,
    pub next_update_time: i64,
    pub peers: i64,
    pub seeders: i64,
    pub leechers: i64,
}

impl Tracker {
    /// Build a tracker from a `trackerStats` element.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut tracker = Self {
            id: 0,
            announce: String::new(),
            site: String::new(),
            status: TrackerStatus::Inactive,
            error_message: String::new(),
            next_update_time: 0,
            peers: 0,
            seeders: 0,
            leechers: 0,
        };
        tracker.update_from_json(value);
        tracker
    }

    /// Apply a `trackerStats` element, returning whether any field changed.
    pub fn update_from_json(&mut self, value: &serde_json::Value) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.id, as_i64(value, "id"));

        let announce = as_string(value, "announce");
        if !announce.is_empty() && announce != self.announce {
            self.site = site::derive_site(&announce);
            changed = true;
        }
        changed |= assign(&mut self.announce, announce);

        if let Some(raw) = value.get("announceState").and_then(|v| v.as_f64()) {
            changed |= assign(
                &mut self.status,
                EnumMapper::from_i64(raw as i64, &STATUS_TABLE, "tracker.status"),
            );
        }

        let succeeded = as_bool(value, "lastAnnounceSucceeded");
        let last_announce = as_i64(value, "lastAnnounceTime");
        let error_message = if !succeeded && last_announce != 0 {
            as_string(value, "lastAnnounceResult")
        } else {
            String::new()
        };
        changed |= assign(&mut self.error_message, error_message);

        changed |= assign(&mut self.next_update_time, as_i64(value, "nextAnnounceTime"));
        changed |= assign(&mut self.peers, as_i64(value, "lastAnnouncePeerCount").max(0));
        changed |= assign(&mut self.seeders, as_i64(value, "seederCount").max(0));
        changed |= assign(&mut self.leechers, as_i64(value, "leecherCount").max(0));
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clamps_negative_counts_to_zero() {
        let tracker = Tracker::from_json(&json!({
            "id": 1,
            "announce": "https://tracker.example.com/announce",
            "seederCount": -1,
            "leecherCount": -1,
        }));
        assert_eq!(tracker.seeders, 0);
        assert_eq!(tracker.leechers, 0);
    }

    #[test]
    fn error_message_requires_both_conditions() {
        let tracker = Tracker::from_json(&json!({
            "id": 1,
            "announce": "https://tracker.example.com/announce",
            "lastAnnounceSucceeded": false,
            "lastAnnounceTime": 0,
            "lastAnnounceResult": "some failure",
        }));
        assert_eq!(tracker.error_message, "");

        let tracker = Tracker::from_json(&json!({
            "id": 1,
            "announce": "https://tracker.example.com/announce",
            "lastAnnounceSucceeded": false,
            "lastAnnounceTime": 1234,
            "lastAnnounceResult": "some failure",
        }));
        assert_eq!(tracker.error_message, "some failure");
    }
}
