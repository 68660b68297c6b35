use hologram_check::{audit, AuditFinding, CsvImporter, InMemoryRangeStore, RangeSnapshot};
use std::sync::Arc;

const HEADER: &str = "row,reference,description,start,end,date\n";

fn import(rows: &str) -> Arc<RangeSnapshot> {
    let store = InMemoryRangeStore::new();
    let serials = format!("{}{}", HEADER, rows);
    CsvImporter::default()
        .import_into(&store, serials.as_bytes(), "invalid_serial\n".as_bytes())
        .unwrap();
    store.snapshot()
}

#[test]
fn test_prefix_mismatch_is_reported() {
    let store = import("1,R1,D1,AA1,AB10,2020-01-01\n");

    let findings = audit(&*store);

    assert_eq!(findings.len(), 1);
    assert!(matches!(findings[0], AuditFinding::PrefixMismatch { row_id: 1, .. }));
    assert_eq!(
        findings[0].to_string(),
        "Start serial and end serial of row 1 start with different letters."
    );
}

#[test]
fn test_collision_is_reported() {
    let store = import(
        "2,R2,D2,AA1,AA10,2020-01-01\n\
         3,R3,D3,AA5,AA15,2020-01-01\n",
    );

    let findings = audit(&*store);

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
fn test_mixed_defects_in_one_import() {
    let store = import(
        "1,R1,D1,AA1,AB10,2020-01-01\n\
         2,R2,D2,BB1,BB10,2020-01-01\n\
         3,R3,D3,BB10,BB20,2020-01-01\n\
         4,R4,D4,CC50,CC10,2020-01-01\n\
         5,R5,D5,AA100,AA200,2020-01-01\n\
         6,R6,D6,AA150,AA160,2020-01-01\n",
    );

    let findings = audit(&*store);

    assert_eq!(
        findings,
        vec![
            AuditFinding::PrefixMismatch {
                row_id: 1,
                start_prefix: "AA".to_string(),
                end_prefix: "AB".to_string(),
            },
            AuditFinding::ReversedRange { row_id: 4 },
            AuditFinding::Collision {
                prefix: "AA".to_string(),
                first: 5,
                second: 6,
            },
            AuditFinding::Collision {
                prefix: "BB".to_string(),
                first: 2,
                second: 3,
            },
        ]
    );
}

#[test]
fn test_clean_import_has_no_findings() {
    let store = import(
        "1,R1,D1,AA1,AA10,2020-01-01\n\
         2,R2,D2,AA11,AA20,2020-01-01\n\
         3,R3,D3,BB1,BB20,2020-01-01\n",
    );

    assert!(audit(&*store).is_empty());
}
