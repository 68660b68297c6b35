use hologram_check::{
    AppConfig, ClassificationStatus, Classifier, CsvImporter, InMemoryRangeStore, LogNotifier,
    SerialChecker, SheetPaths,
};
use std::sync::Arc;
use tempfile::TempDir;

const OLD_SERIALS: &str = "\
row,reference,description,start,end,date
1,SE-100,Breaker,FA1000000,FA1999999,2019-03-21
";

const NEW_SERIALS: &str = "\
row,reference,description,start,end,date
1,SE-500,Contactor,KB100,KB900,2023-05-01
";

const NEW_INVALIDS: &str = "\
invalid_serial
KB500
";

fn config_for(dir: &TempDir) -> AppConfig {
    AppConfig::from_toml_str(&format!(
        r#"
[store]
serials_path = "{}"
invalids_path = "{}"
"#,
        dir.path().join("store/serials.csv").display(),
        dir.path().join("store/invalids.csv").display(),
    ))
    .unwrap()
}

/// Loads the store the way every command does, from the configured paths.
fn checker_from_config(config: &AppConfig) -> SerialChecker<LogNotifier> {
    let store = InMemoryRangeStore::new();
    CsvImporter::new(config.canonicalizer().unwrap())
        .import_files(&store, &config.store.serials_path, &config.store.invalids_path)
        .unwrap();
    SerialChecker::new(Arc::new(store), Classifier::default(), LogNotifier)
}

#[test]
fn test_imported_sheets_are_seen_by_later_checks() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    std::fs::create_dir_all(temp_dir.path().join("store")).unwrap();
    std::fs::write(&config.store.serials_path, OLD_SERIALS).unwrap();
    std::fs::write(&config.store.invalids_path, "invalid_serial\n").unwrap();
    assert_eq!(
        checker_from_config(&config).check("FA1234567").unwrap().status,
        ClassificationStatus::Ok
    );

    let incoming = temp_dir.path().join("incoming");
    std::fs::create_dir_all(&incoming).unwrap();
    std::fs::write(incoming.join("serials.csv"), NEW_SERIALS).unwrap();
    std::fs::write(incoming.join("invalids.csv"), NEW_INVALIDS).unwrap();

    let store = InMemoryRangeStore::new();
    let report = CsvImporter::new(config.canonicalizer().unwrap())
        .import_and_install(
            &store,
            &SheetPaths::new(incoming.join("serials.csv"), incoming.join("invalids.csv")),
            &SheetPaths::new(&config.store.serials_path, &config.store.invalids_path),
        )
        .unwrap();
    assert_eq!(report.serials_imported, 1);
    assert_eq!(report.invalids_imported, 1);

    let checker = checker_from_config(&config);
    assert_eq!(
        checker.check("FA1234567").unwrap().status,
        ClassificationStatus::NotFound
    );
    assert_eq!(checker.check("kb-300").unwrap().status, ClassificationStatus::Ok);
    assert_eq!(checker.check("KB500").unwrap().status, ClassificationStatus::Failure);
}

#[test]
fn test_import_creates_missing_store_directory() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let serials = temp_dir.path().join("serials.csv");
    let invalids = temp_dir.path().join("invalids.csv");
    std::fs::write(&serials, NEW_SERIALS).unwrap();
    std::fs::write(&invalids, NEW_INVALIDS).unwrap();

    CsvImporter::default()
        .import_and_install(
            &InMemoryRangeStore::new(),
            &SheetPaths::new(&serials, &invalids),
            &SheetPaths::new(&config.store.serials_path, &config.store.invalids_path),
        )
        .unwrap();

    assert_eq!(
        checker_from_config(&config).check("KB899").unwrap().status,
        ClassificationStatus::Ok
    );
}
