use crate::domain::model::AuditFinding;
use crate::domain::ports::RangeStore;
use std::collections::BTreeMap;

/// Scans the store for prefix mismatches, reversed ranges and overlapping ranges
/// sharing a prefix. Never fails; an empty list means the data is consistent.
///
/// Collision checking compares every pair inside a prefix group, which is fine
/// for an on-demand check after an import.
pub fn audit<S: RangeStore + ?Sized>(store: &S) -> Vec<AuditFinding> {
    let ranges = store.all_ranges();
    let mut findings = Vec::new();
    let mut groups: BTreeMap<String, Vec<(u64, u128, u128)>> = BTreeMap::new();

    for range in &ranges {
        let start = range.start.split();
        let end = range.end.split();

        if start.prefix != end.prefix {
            findings.push(AuditFinding::PrefixMismatch {
                row_id: range.row_id,
                start_prefix: start.prefix.to_string(),
                end_prefix: end.prefix.to_string(),
            });
            continue;
        }

        if start.value > end.value {
            findings.push(AuditFinding::ReversedRange {
                row_id: range.row_id,
            });
            continue;
        }

        groups
            .entry(start.prefix.to_string())
            .or_default()
            .push((range.row_id, start.value, end.value));
    }

    for (prefix, members) in &groups {
        for (i, &(first, s1, e1)) in members.iter().enumerate() {
            for &(second, s2, e2) in &members[i + 1..] {
                if overlaps(s1, e1, s2, e2) {
                    findings.push(AuditFinding::Collision {
                        prefix: prefix.clone(),
                        first,
                        second,
                    });
                }
            }
        }
    }

    tracing::debug!(
        "Audited {} ranges in {} prefix groups, {} finding(s)",
        ranges.len(),
        groups.len(),
        findings.len()
    );

    findings
}

/// Closed intervals; touching boundaries count as overlap.
fn overlaps(s1: u128, e1: u128, s2: u128, e2: u128) -> bool {
    s1 <= e2 && s2 <= e1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::InMemoryRangeStore;
    use crate::core::canonicalizer::normalize;
    use crate::domain::model::SerialRange;
    use chrono::NaiveDate;

    fn range(row_id: u64, start: &str, end: &str) -> SerialRange {
        SerialRange {
            row_id,
            reference: String::new(),
            description: String::new(),
            start: normalize(start).unwrap(),
            end: normalize(end).unwrap(),
            issued_on: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
        }
    }

    fn audit_ranges(ranges: Vec<SerialRange>) -> Vec<AuditFinding> {
        let store = InMemoryRangeStore::new();
        store.replace(ranges, Vec::new());
        audit(&*store.snapshot())
    }

    #[test]
    fn test_prefix_mismatch() {
        let findings = audit_ranges(vec![range(1, "AA1", "AB10")]);
        assert_eq!(
            findings,
            vec![AuditFinding::PrefixMismatch {
                row_id: 1,
                start_prefix: "AA".to_string(),
                end_prefix: "AB".to_string(),
            }]
        );
    }

    #[test]
    fn test_partial_overlap_is_collision() {
        let findings = audit_ranges(vec![range(2, "AA1", "AA10"), range(3, "AA5", "AA15")]);
        assert_eq!(
            findings,
            vec![AuditFinding::Collision {
                prefix: "AA".to_string(),
                first: 2,
                second: 3,
            }]
        );
    }

    #[test]
    fn test_containment_and_touching_boundaries_collide() {
        let findings = audit_ranges(vec![
            range(1, "AA1", "AA100"),
            range(2, "AA20", "AA30"),
            range(3, "AA100", "AA200"),
        ]);
        let pairs: Vec<(u64, u64)> = findings
            .iter()
            .filter_map(|f| match f {
                AuditFinding::Collision { first, second, .. } => Some((*first, *second)),
                _ => None,
            })
            .collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3)]);
    }

    #[test]
    fn test_disjoint_ranges_and_other_prefixes_are_clean() {
        let findings = audit_ranges(vec![
            range(1, "AA1", "AA10"),
            range(2, "AA11", "AA20"),
            range(3, "BB1", "BB20"),
        ]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_mismatched_range_is_not_collision_checked() {
        let findings = audit_ranges(vec![range(1, "AA1", "AB10"), range(2, "AA1", "AA10")]);
        assert_eq!(findings.len(), 1);
        assert!(matches!(findings[0], AuditFinding::PrefixMismatch { row_id: 1, .. }));
    }

    #[test]
    fn test_reversed_range_is_reported() {
        let findings = audit_ranges(vec![range(4, "CC90", "CC10"), range(5, "CC20", "CC30")]);
        assert_eq!(findings, vec![AuditFinding::ReversedRange { row_id: 4 }]);
    }

    #[test]
    fn test_empty_store_has_no_findings() {
        assert!(audit_ranges(Vec::new()).is_empty());
    }
}
