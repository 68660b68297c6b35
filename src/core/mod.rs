pub mod auditor;
pub mod canonicalizer;
pub mod checker;
pub mod classifier;
pub mod messages;

pub use crate::domain::model::{
    AuditFinding, ClassificationResult, ClassificationStatus, NormalizedKey, SerialRange,
};
pub use crate::domain::ports::{Notifier, RangeStore, TransactionLog};
pub use crate::utils::error::Result;
