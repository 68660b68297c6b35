use crate::domain::model::{StatusCounts, TransactionRecord};
use crate::domain::ports::TransactionLog;
use crate::utils::error::Result;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only CSV file of processed messages.
pub struct CsvTransactionLog {
    path: PathBuf,
    // 同一行程內序列化寫入
    write_lock: Mutex<()>,
}

impl CsvTransactionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<TransactionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}

impl TransactionLog for CsvTransactionLog {
    fn record(&self, entry: &TransactionRecord) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let is_new = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new().has_headers(is_new).from_writer(file);
        writer.serialize(entry)?;
        writer.flush()?;

        tracing::debug!("Logged {} transaction from {}", entry.status, entry.sender);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<TransactionRecord>> {
        let mut records = self.read_all()?;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(records)
    }

    fn status_counts(&self) -> Result<StatusCounts> {
        let mut counts = StatusCounts::default();
        for record in self.read_all()? {
            counts.add(record.status);
        }
        Ok(counts)
    }
}
