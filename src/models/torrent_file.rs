//! A single file within a torrent (spec.md §3 "TorrentFile").

use super::{EnumMapper, as_bool, as_i64, as_string, assign};

/// Download priority, mapped to/from the daemon's `-1/0/1` convention
/// (spec.md §3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilePriority {
    Low,
    #[default]
    Normal,
    High,
}

const PRIORITY_TABLE: [(i64, FilePriority); 3] = [
    (-1, FilePriority::Low),
    (0, FilePriority::Normal),
    (1, FilePriority::High),
];

impl FilePriority {
    fn from_daemon(raw: i64) -> Self {
        EnumMapper::from_i64(raw, &PRIORITY_TABLE, "file.priority")
    }

    /// The daemon-visible integer for this variant, used when posting
    /// `torrent-set` priority changes.
    pub fn to_daemon(self) -> i64 {
        match self {
            Self::Low => -1,
            Self::Normal => 0,
            Self::High => 1,
        }
    }
}

/// One entry in a torrent's `files` collection (index-stable, spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentFile {
    /// Index in the file list; doubles as reconciler identity.
    pub id: usize,
    /// Path components split on `/`.
    pub path: Vec<String>,
    pub size: i64,
    pub completed_size: i64,
    pub priority: FilePriority,
    pub wanted: bool,
}

impl TorrentFile {
    /// Build a file entry at `id` from one element of the `files` array,
    /// optionally layering in the matching `fileStats`/`priorities`/`wanted`
    /// arrays element (all keyed by the same index).
    pub fn from_json(id: usize, file: &serde_json::Value) -> Self {
        let mut entry = Self {
            id,
            path: Vec::new(),
            size: 0,
            completed_size: 0,
            priority: FilePriority::Normal,
            wanted: true,
        };
        entry.update_from_json(file);
        entry
    }

    /// Apply a `files`/`fileStats` element for this index, returning
    /// whether any field changed.
    pub fn update_from_json(&mut self, value: &serde_json::Value) -> bool {
        let mut changed = false;
        let name = as_string(value, "name");
        if !name.is_empty() {
            changed |= assign(
                &mut self.path,
                name.split('/').map(str::to_string).collect(),
            );
        }
        changed |= assign(&mut self.size, as_i64(value, "length"));
        changed |= assign(
            &mut self.completed_size,
            as_i64(value, "bytesCompleted"),
        );
        if let Some(raw) = value.get("priority").and_then(|v| v.as_f64()) {
            changed |= assign(&mut self.priority, FilePriority::from_daemon(raw as i64));
        }
        if value.get("wanted").is_some() {
            changed |= assign(&mut self.wanted, as_bool(value, "wanted"));
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn priority_round_trips_known_value() {
        let mut file = TorrentFile::from_json(0, &json!({ "name": "a/b.mkv", "priority": -1 }));
        assert_eq!(file.priority, FilePriority::Low);
        assert_eq!(file.priority.to_daemon(), -1);

        file.update_from_json(&json!({ "priority": 99 }));
        assert_eq!(file.priority, FilePriority::Normal);
    }

    #[test]
    fn path_splits_on_slash() {
        let file = TorrentFile::from_json(0, &json!({ "name": "dir/sub/file.txt" }));
        assert_eq!(file.path, vec!["dir", "sub", "file.txt"]);
    }
}
