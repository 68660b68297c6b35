use clap::Parser;
use hologram_check::domain::ports::{Notifier, TransactionLog};
use hologram_check::utils::error::ErrorSeverity;
use hologram_check::utils::{logger, report::capped_lines, validation::Validate};
use hologram_check::{
    audit, AppConfig, Classifier, CliConfig, Command, CsvImporter, CsvTransactionLog,
    HologramError, HttpSmsNotifier, InMemoryRangeStore, LogNotifier, SerialChecker, SheetPaths,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting hologram-check");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match AppConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: &Command, config: &AppConfig) -> hologram_check::Result<()> {
    match command {
        Command::Import { serials, invalids } => {
            let sources = SheetPaths::new(
                serials.as_deref().unwrap_or(&config.store.serials_path),
                invalids.as_deref().unwrap_or(&config.store.invalids_path),
            );
            let destination = SheetPaths::new(&config.store.serials_path, &config.store.invalids_path);

            let store = InMemoryRangeStore::new();
            let report = CsvImporter::new(config.canonicalizer()?).import_and_install(
                &store,
                &sources,
                &destination,
            )?;

            println!(
                "✅ Imported {} serials and {} invalid codes, {} rows of failure",
                report.serials_imported,
                report.invalids_imported,
                report.errors.len()
            );
            for line in capped_lines(&report.errors, config.max_findings(), "Too many errors!") {
                println!("  ⚠️ {}", line);
            }
        }
        Command::Check { code, json } => {
            let store = load_store(config)?;
            let checker = SerialChecker::new(store, classifier(config)?, LogNotifier);
            let result = checker.check(code)?;

            if *json {
                let body = serde_json::json!({
                    "status": result.status,
                    "answer": result.message,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{} - {}", result.status, result.message);
            }
        }
        Command::Audit => {
            let store = load_store(config)?;
            let findings = audit(&*store.snapshot());

            if findings.is_empty() {
                println!("✅ No defects found in {} ranges", store.snapshot().range_count());
            } else {
                println!("⚠️ {} defect(s) found", findings.len());
                for line in capped_lines(&findings, config.max_findings(), "Too many defects.") {
                    println!("  {}", line);
                }
            }
        }
        Command::Process { sender, message } => {
            let store = load_store(config)?;
            match config.active_notifier() {
                Some(notifier) => {
                    let timeout = Duration::from_secs(config.notifier_timeout_seconds());
                    let notifier = HttpSmsNotifier::new(notifier.endpoint.clone(), timeout);
                    process(config, store, notifier, sender, message).await?;
                }
                None => process(config, store, LogNotifier, sender, message).await?,
            }
        }
        Command::Stats { recent } => {
            let log_config = config.transaction_log.as_ref().ok_or_else(|| {
                HologramError::MissingConfigError {
                    field: "transaction_log.path".to_string(),
                }
            })?;
            let log = CsvTransactionLog::new(&log_config.path);

            let counts = log.status_counts()?;
            println!(
                "📊 OK: {}  FAILURE: {}  DOUBLE: {}  NOT-FOUND: {}  (total {})",
                counts.ok,
                counts.failure,
                counts.double,
                counts.not_found,
                counts.total()
            );
            for entry in log.recent(*recent)? {
                println!(
                    "{}  {:<9}  {}  {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.status,
                    entry.sender,
                    entry.message
                );
            }
        }
    }

    Ok(())
}

async fn process<N: Notifier>(
    config: &AppConfig,
    store: Arc<InMemoryRangeStore>,
    notifier: N,
    sender: &str,
    message: &str,
) -> hologram_check::Result<()> {
    let mut checker = SerialChecker::new(store, classifier(config)?, notifier);
    if let Some(log_config) = &config.transaction_log {
        checker = checker.with_transaction_log(Box::new(CsvTransactionLog::new(&log_config.path)));
    }

    let result = checker.process(sender, message).await?;
    println!("{} - {}", result.status, result.message);
    Ok(())
}

fn classifier(config: &AppConfig) -> hologram_check::Result<Classifier> {
    Ok(Classifier::new(config.canonicalizer()?, config.messages.clone()))
}

fn load_store(config: &AppConfig) -> hologram_check::Result<Arc<InMemoryRangeStore>> {
    let store = InMemoryRangeStore::new();
    let report = CsvImporter::new(config.canonicalizer()?).import_files(
        &store,
        &config.store.serials_path,
        &config.store.invalids_path,
    )?;

    if !report.errors.is_empty() {
        tracing::warn!(
            "⚠️ {} rows were rejected while loading the range store; run `import` for details",
            report.errors.len()
        );
    }

    Ok(Arc::new(store))
}
