use crate::domain::model::{NormalizedKey, SerialRange, StatusCounts, TransactionRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read side of the reference data. Keys handed in are already normalized.
pub trait RangeStore: Send + Sync {
    fn all_ranges(&self) -> Vec<SerialRange>;
    fn contains_invalid(&self, key: &NormalizedKey) -> bool;
    fn matching_ranges(&self, key: &NormalizedKey) -> Vec<SerialRange>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, message: &str) -> Result<()>;
}

pub trait TransactionLog: Send + Sync {
    fn record(&self, entry: &TransactionRecord) -> Result<()>;
    /// Newest first.
    fn recent(&self, limit: usize) -> Result<Vec<TransactionRecord>>;
    fn status_counts(&self) -> Result<StatusCounts>;
}
