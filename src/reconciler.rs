//! Generic List Reconciler (spec.md §4.3): merges a new collection against
//! an existing ordered list in place, reporting contiguous removed /
//! changed / added index ranges suitable for incremental UI binding.
//!
//! Ranges are half-open and refer to `items` positions as they stand
//! immediately before the corresponding batch: after a removal run,
//! later indices in the same pass are already shifted by the removed
//! count, matching the source's iteration order (spec.md §4.3).

/// Supplies the identity `reconcile` matches old items against new ones.
/// The default is `ById`, used wherever the entity has a stable integer
/// id; `ByAddress`/`ByTrackerId` cover the other keyed collections
/// (spec.md §3: files/torrents by `id`, peers by `address`, trackers by
/// `tracker_id`).
pub trait Identity<T> {
    type Key: PartialEq;
    fn key(&self, item: &T) -> Self::Key;
}

/// Identity by an `id: i64` field. Implemented per-entity below since the
/// field's owning type differs.
pub struct ById;

/// Identity by a `tracker_id`-equivalent `id: i64` field on `Tracker`.
pub struct ByTrackerId;

/// Identity by `address: String` on `Peer`.
pub struct ByAddress;

impl Identity<crate::models::Torrent> for ById {
    type Key = i64;
    fn key(&self, item: &crate::models::Torrent) -> i64 {
        item.id
    }
}

impl Identity<crate::models::TorrentFile> for ById {
    type Key = usize;
    fn key(&self, item: &crate::models::TorrentFile) -> usize {
        item.id
    }
}

impl Identity<crate::models::Tracker> for ByTrackerId {
    type Key = i64;
    fn key(&self, item: &crate::models::Tracker) -> i64 {
        item.id
    }
}

impl Identity<crate::models::Peer> for ByAddress {
    type Key = String;
    fn key(&self, item: &crate::models::Peer) -> String {
        item.address.clone()
    }
}

/// Contiguous index ranges touched by one `reconcile()` call, half-open
/// (`[first, last)`), in the order notifications would be emitted:
/// removed and changed batches interleaved, then at most one add batch
/// (spec.md §4.3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub removed: Vec<(usize, usize)>,
    pub changed: Vec<(usize, usize)>,
    /// Count of items appended at the end; always zero or one batch.
    pub added: usize,
}

impl ReconcileReport {
    pub fn is_not_empty(&self) -> bool {
        !self.removed.is_empty() || !self.changed.is_empty() || self.added != 0
    }
}

/// Reconciles `items` against `new_items` in place using `identity` to
/// match old to new, and `update_item(old, new) -> changed` to apply
/// matched updates. See module docs for the notification contract.
pub fn reconcile<T, I>(
    items: &mut Vec<T>,
    new_items: Vec<T>,
    identity: &I,
    mut update_item: impl FnMut(&mut T, &T) -> bool,
) -> ReconcileReport
where
    I: Identity<T>,
{
    let mut new_items: Vec<Option<T>> = new_items.into_iter().map(Some).collect();
    let find_match = |old: &T, new_items: &[Option<T>]| -> Option<usize> {
        let old_key = identity.key(old);
        new_items
            .iter()
            .position(|candidate| candidate.as_ref().is_some_and(|c| identity.key(c) == old_key))
    };

    let old_items = std::mem::take(items);
    let mut kept = Vec::with_capacity(old_items.len());

    let mut report = ReconcileReport::default();
    // Removed runs don't advance `write_idx` (the removed items never land
    // in `kept`), so the run's length has to be tracked separately from its
    // start to recover the half-open `[start, start + len)` range.
    let mut removed_run: Option<(usize, usize)> = None;
    let mut changed_run_start: Option<usize> = None;
    let mut write_idx = 0usize;

    fn flush_changed(run_start: &mut Option<usize>, write_idx: usize, into: &mut Vec<(usize, usize)>) {
        if let Some(start) = run_start.take() {
            into.push((start, write_idx));
        }
    }

    fn flush_removed(run: &mut Option<(usize, usize)>, into: &mut Vec<(usize, usize)>) {
        if let Some((start, len)) = run.take() {
            into.push((start, start + len));
        }
    }

    for mut old in old_items {
        match find_match(&old, &new_items) {
            None => {
                flush_changed(&mut changed_run_start, write_idx, &mut report.changed);
                match &mut removed_run {
                    Some((_, len)) => *len += 1,
                    None => removed_run = Some((write_idx, 1)),
                }
            }
            Some(new_idx) => {
                flush_removed(&mut removed_run, &mut report.removed);
                let new_item = new_items[new_idx]
                    .take()
                    .expect("matched index was checked Some above");
                let changed = update_item(&mut old, &new_item);
                if changed {
                    changed_run_start.get_or_insert(write_idx);
                } else {
                    flush_changed(&mut changed_run_start, write_idx, &mut report.changed);
                }
                kept.push(old);
                write_idx += 1;
            }
        }
    }
    flush_removed(&mut removed_run, &mut report.removed);
    flush_changed(&mut changed_run_start, write_idx, &mut report.changed);

    let appended: Vec<T> = new_items.into_iter().flatten().collect();
    report.added = appended.len();
    kept.extend(appended);

    *items = kept;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        value: i64,
    }

    struct ItemById;
    impl Identity<Item> for ItemById {
        type Key = i64;
        fn key(&self, item: &Item) -> i64 {
            item.id
        }
    }

    fn copy(old: &mut Item, new: &Item) -> bool {
        if old.value == new.value {
            false
        } else {
            old.value = new.value;
            true
        }
    }

    #[test]
    fn s4_torrent_reconciliation_scenario() {
        let mut items = vec![
            Item { id: 1, value: 0 },
            Item { id: 2, value: 0 },
            Item { id: 3, value: 50 },
        ];
        let new_items = vec![
            Item { id: 2, value: 0 },
            Item { id: 3, value: 70 },
            Item { id: 4, value: 0 },
        ];
        let report = reconcile(&mut items, new_items, &ItemById, copy);
        assert_eq!(report.removed, vec![(0, 1)]);
        assert_eq!(report.changed, vec![(1, 2)]);
        assert_eq!(report.added, 1);
        assert_eq!(
            items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn identical_lists_produce_empty_report() {
        let mut items = vec![Item { id: 1, value: 5 }];
        let new_items = vec![Item { id: 1, value: 5 }];
        let report = reconcile(&mut items, new_items, &ItemById, copy);
        assert!(!report.is_not_empty());
    }
}
