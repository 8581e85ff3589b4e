//! One entry in a torrent's peer list (spec.md §3 "Peer").

use super::{as_f64, as_string, assign};

/// A connected peer, identified by `address` for reconciliation purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    pub address: String,
    pub client: String,
    pub download_speed: i64,
    pub upload_speed: i64,
    /// Clamped to `[0, 1]`.
    pub progress: f64,
    pub flags: String,
}

impl Peer {
    /// Build a peer from one `peers` array element.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut peer = Self {
            address: as_string(value, "address"),
            client: String::new(),
            download_speed: 0,
            upload_speed: 0,
            progress: 0.0,
            flags: String::new(),
        };
        peer.update_from_json(value);
        peer
    }

    /// Apply a `peers` array element, returning whether any field changed.
    pub fn update_from_json(&mut self, value: &serde_json::Value) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.client, as_string(value, "clientName"));
        changed |= assign(
            &mut self.download_speed,
            as_f64(value, "rateToClient") as i64,
        );
        changed |= assign(
            &mut self.upload_speed,
            as_f64(value, "rateToPeer") as i64,
        );
        changed |= assign(
            &mut self.progress,
            as_f64(value, "progress").clamp(0.0, 1.0),
        );
        changed |= assign(&mut self.flags, as_string(value, "flagStr"));
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clamps_progress_into_unit_interval() {
        let peer = Peer::from_json(&json!({
            "address": "10.0.0.1",
            "progress": 1.5,
        }));
        assert_eq!(peer.progress, 1.0);

        let peer = Peer::from_json(&json!({
            "address": "10.0.0.1",
            "progress": -0.5,
        }));
        assert_eq!(peer.progress, 0.0);
    }

    #[test]
    fn address_is_identity() {
        let peer = Peer::from_json(&json!({ "address": "10.0.0.1" }));
        assert_eq!(peer.address, "10.0.0.1");
    }
}
