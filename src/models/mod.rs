//! Entity model: plain value types mirroring the daemon's JSON shapes.
//!
//! Every entity exposes `update_from_json(&mut self, &serde_json::Value) -> bool`
//! (spec.md §4.2), returning whether any field actually changed so the
//! orchestrator and list reconciler can report precise change sets instead
//! of treating every refresh as a full reset.

mod enum_mapper;
mod peer;
mod server_settings;
mod server_stats;
mod torrent;
mod torrent_file;
mod tracker;

pub use enum_mapper::EnumMapper;
pub use peer::Peer;
pub use server_settings::ServerSettings;
pub use server_stats::{ServerStats, SessionStatsSnapshot};
pub use torrent::{Torrent, TorrentStatus};
pub use torrent_file::{FilePriority, TorrentFile};
pub use tracker::{Tracker, TrackerStatus};

/// Pulls a JSON number out as `f64` (Transmission convention, spec.md §4.2)
/// and casts it to the target integer/float type, defaulting to zero when
/// the field is absent or not a number.
pub(crate) fn as_i64(value: &serde_json::Value, field: &str) -> i64 {
    value.get(field).and_then(|v| v.as_f64()).unwrap_or(0.0) as i64
}

pub(crate) fn as_f64(value: &serde_json::Value, field: &str) -> f64 {
    value.get(field).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

pub(crate) fn as_bool(value: &serde_json::Value, field: &str) -> bool {
    value.get(field).and_then(|v| v.as_bool()).unwrap_or(false)
}

pub(crate) fn as_string(value: &serde_json::Value, field: &str) -> String {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Assigns `new` into `*slot` and returns whether it actually changed,
/// centralizing the `changed |= ...` bookkeeping every `update_from_json`
/// needs.
pub(crate) fn assign<T: PartialEq>(slot: &mut T, new: T) -> bool {
    if *slot == new {
        false
    } else {
        *slot = new;
        true
    }
}
