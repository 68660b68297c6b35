use crate::adapters::memory_store::InMemoryRangeStore;
use crate::core::classifier::Classifier;
use crate::domain::model::{ClassificationResult, TransactionRecord};
use crate::domain::ports::{Notifier, TransactionLog};
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;

/// Handles inbound codes: classify against the current store snapshot, then log
/// the transaction and reply to the sender.
pub struct SerialChecker<N: Notifier> {
    store: Arc<InMemoryRangeStore>,
    classifier: Classifier,
    notifier: N,
    log: Option<Box<dyn TransactionLog>>,
}

impl<N: Notifier> SerialChecker<N> {
    pub fn new(store: Arc<InMemoryRangeStore>, classifier: Classifier, notifier: N) -> Self {
        Self {
            store,
            classifier,
            notifier,
            log: None,
        }
    }

    pub fn with_transaction_log(mut self, log: Box<dyn TransactionLog>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn store(&self) -> &Arc<InMemoryRangeStore> {
        &self.store
    }

    /// Classification only; nothing is logged or sent.
    pub fn check(&self, code: &str) -> Result<ClassificationResult> {
        let snapshot = self.store.snapshot();
        self.classifier.classify(code, &*snapshot)
    }

    /// The inbound message flow. Logging and delivery failures are reported as
    /// warnings and never change the returned classification.
    pub async fn process(&self, sender: &str, message: &str) -> Result<ClassificationResult> {
        let result = self.check(message)?;
        tracing::info!("🔎 {} from {}: {}", result.status, sender, result.key);

        if let Some(log) = &self.log {
            let entry = TransactionRecord {
                status: result.status,
                sender: sender.to_string(),
                message: message.to_string(),
                answer: result.message.clone(),
                timestamp: Utc::now(),
            };
            if let Err(e) = log.record(&entry) {
                tracing::warn!("⚠️ Failed to log transaction from {}: {}", sender, e);
            }
        }

        if let Err(e) = self.notifier.send(sender, &result.message).await {
            tracing::warn!("⚠️ Failed to deliver reply to {}: {}", sender, e);
        }

        Ok(result)
    }
}
