use crate::domain::model::{NormalizedKey, SerialRange};
use crate::domain::ports::RangeStore;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

/// Immutable view of one import: ranges in import order, an index sorted by
/// `start`, and the invalid keys.
#[derive(Debug, Default)]
pub struct RangeSnapshot {
    ranges: Vec<SerialRange>,
    by_start: Vec<usize>,
    invalids: BTreeSet<NormalizedKey>,
}

impl RangeSnapshot {
    pub fn new(ranges: Vec<SerialRange>, invalids: impl IntoIterator<Item = NormalizedKey>) -> Self {
        let mut by_start: Vec<usize> = (0..ranges.len()).collect();
        by_start.sort_by(|&a, &b| ranges[a].start.cmp(&ranges[b].start));

        Self {
            ranges,
            by_start,
            invalids: invalids.into_iter().collect(),
        }
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalids.len()
    }
}

impl RangeStore for RangeSnapshot {
    fn all_ranges(&self) -> Vec<SerialRange> {
        self.ranges.clone()
    }

    fn contains_invalid(&self, key: &NormalizedKey) -> bool {
        self.invalids.contains(key)
    }

    fn matching_ranges(&self, key: &NormalizedKey) -> Vec<SerialRange> {
        // 只有 start <= key 的區間可能包含 key
        let candidates = self
            .by_start
            .partition_point(|&idx| self.ranges[idx].start <= *key);

        let mut matches: Vec<usize> = self.by_start[..candidates]
            .iter()
            .copied()
            .filter(|&idx| *key <= self.ranges[idx].end)
            .collect();
        matches.sort_unstable();

        matches.into_iter().map(|idx| self.ranges[idx].clone()).collect()
    }
}

/// Range store kept in memory. A bulk import swaps the whole snapshot at once,
/// so readers see either the old or the new data, never a mix.
///
/// Queries go through [`InMemoryRangeStore::snapshot`]: one classification or
/// audit must read every lookup from the same snapshot.
#[derive(Debug, Default)]
pub struct InMemoryRangeStore {
    current: RwLock<Arc<RangeSnapshot>>,
}

impl InMemoryRangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<RangeSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Drops the previous contents and installs the given ones.
    pub fn replace(&self, ranges: Vec<SerialRange>, invalids: Vec<NormalizedKey>) {
        let snapshot = Arc::new(RangeSnapshot::new(ranges, invalids));
        tracing::debug!(
            "Replacing range store: {} ranges, {} invalid codes",
            snapshot.range_count(),
            snapshot.invalid_count()
        );
        match self.current.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::canonicalizer::normalize;
    use chrono::NaiveDate;

    fn range(row_id: u64, start: &str, end: &str) -> SerialRange {
        SerialRange {
            row_id,
            reference: String::new(),
            description: String::new(),
            start: normalize(start).unwrap(),
            end: normalize(end).unwrap(),
            issued_on: NaiveDate::from_ymd_opt(2022, 2, 2).unwrap(),
        }
    }

    #[test]
    fn test_matching_ranges_returns_all_covering_ranges_in_import_order() {
        let store = InMemoryRangeStore::new();
        store.replace(
            vec![range(9, "CC40", "CC90"), range(3, "CC10", "CC50"), range(5, "AA1", "AA5")],
            Vec::new(),
        );

        let ids: Vec<u64> = store
            .snapshot()
            .matching_ranges(&normalize("CC45").unwrap())
            .iter()
            .map(|r| r.row_id)
            .collect();
        assert_eq!(ids, vec![9, 3]);

        assert!(store.snapshot().matching_ranges(&normalize("CC91").unwrap()).is_empty());
        assert!(store.snapshot().matching_ranges(&normalize("BB1").unwrap()).is_empty());
    }

    #[test]
    fn test_all_ranges_keeps_import_order() {
        let store = InMemoryRangeStore::new();
        store.replace(vec![range(2, "ZZ1", "ZZ2"), range(1, "AA1", "AA2")], Vec::new());
        let ids: Vec<u64> = store.snapshot().all_ranges().iter().map(|r| r.row_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = InMemoryRangeStore::new();
        store.replace(vec![range(1, "AA1", "AA10")], vec![normalize("BB5").unwrap()]);
        store.replace(vec![range(2, "CC1", "CC10")], Vec::new());

        assert_eq!(store.snapshot().all_ranges().len(), 1);
        assert!(!store.snapshot().contains_invalid(&normalize("BB5").unwrap()));
        assert!(store.snapshot().matching_ranges(&normalize("AA5").unwrap()).is_empty());
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_replace() {
        let store = InMemoryRangeStore::new();
        store.replace(vec![range(1, "AA1", "AA10")], vec![normalize("BB5").unwrap()]);
        let before = store.snapshot();

        store.replace(Vec::new(), Vec::new());

        assert_eq!(before.range_count(), 1);
        assert!(before.contains_invalid(&normalize("bb-5").unwrap()));
        assert_eq!(store.snapshot().range_count(), 0);
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryRangeStore::new();
        let key = normalize("AA1").unwrap();
        assert!(store.snapshot().all_ranges().is_empty());
        assert!(!store.snapshot().contains_invalid(&key));
        assert!(store.snapshot().matching_ranges(&key).is_empty());
    }

    #[test]
    fn test_classification_never_mixes_two_snapshots() {
        use crate::core::classifier::Classifier;
        use crate::domain::model::ClassificationStatus;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        // 兩個版本：XX50 只在黑名單 (FAILURE)，或落在兩個區間 (DOUBLE)
        let store = Arc::new(InMemoryRangeStore::new());
        store.replace(Vec::new(), vec![normalize("XX50").unwrap()]);
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut flip = false;
                while !done.load(Ordering::Relaxed) {
                    if flip {
                        store.replace(Vec::new(), vec![normalize("XX50").unwrap()]);
                    } else {
                        store.replace(
                            vec![range(1, "XX1", "XX90"), range(2, "XX40", "XX60")],
                            Vec::new(),
                        );
                    }
                    flip = !flip;
                }
            })
        };

        let classifier = Classifier::default();
        for _ in 0..20_000 {
            let status = classifier.classify("XX50", &*store.snapshot()).unwrap().status;
            assert!(
                matches!(status, ClassificationStatus::Failure | ClassificationStatus::Double),
                "unexpected status {}",
                status
            );
        }

        done.store(true, Ordering::Relaxed);
        writer.join().unwrap();
    }
}
