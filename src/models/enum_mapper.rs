//! Generic integer/string-to-enum conversion used by [`super::TorrentFile`]
//! and [`super::Tracker`] (spec.md §4.2): unknown daemon values fall back
//! to the variant's `Default` and are logged rather than rejected, since a
//! newer daemon may introduce values this client doesn't know about yet.

/// Looks up `raw` in `table` and returns the mapped variant, or `T::default()`
/// with a `tracing::warn!` when no entry matches.
pub struct EnumMapper;

impl EnumMapper {
    /// Map a daemon-visible `i64` to a tagged variant via an explicit
    /// `(raw, variant)` table.
    pub fn from_i64<T: Default + Clone>(raw: i64, table: &[(i64, T)], field: &str) -> T {
        match table.iter().find(|(candidate, _)| *candidate == raw) {
            Some((_, variant)) => variant.clone(),
            None => {
                tracing::warn!(field, raw, "unknown enum value, using default");
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    enum Sample {
        #[default]
        A,
        B,
    }

    #[test]
    fn maps_known_value() {
        let table = [(0, Sample::A), (1, Sample::B)];
        assert_eq!(EnumMapper::from_i64(1, &table, "sample"), Sample::B);
    }

    #[test]
    fn falls_back_to_default_on_unknown_value() {
        let table = [(0, Sample::A), (1, Sample::B)];
        assert_eq!(EnumMapper::from_i64(99, &table, "sample"), Sample::A);
    }
}
