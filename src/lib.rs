pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{
    csv_import::{CsvImporter, ImportReport, ImportRowError, SheetPaths},
    memory_store::{InMemoryRangeStore, RangeSnapshot},
    sms::{HttpSmsNotifier, LogNotifier},
    transaction_log::CsvTransactionLog,
};
pub use config::AppConfig;
pub use crate::core::{
    auditor::audit,
    canonicalizer::{normalize, Canonicalizer},
    checker::SerialChecker,
    classifier::Classifier,
    messages::MessageTemplates,
};
pub use domain::model::{AuditFinding, ClassificationResult, ClassificationStatus, NormalizedKey, SerialRange};
pub use utils::error::{HologramError, Result};
