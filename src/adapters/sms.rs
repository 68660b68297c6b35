use crate::domain::ports::Notifier;
use crate::utils::error::{HologramError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Sends replies through an HTTP SMS gateway (form fields `receptor` and `message`).
pub struct HttpSmsNotifier {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSmsNotifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for HttpSmsNotifier {
    async fn send(&self, recipient: &str, message: &str) -> Result<()> {
        tracing::debug!("Sending SMS to {} via gateway", recipient);

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .form(&[("receptor", recipient), ("message", message)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("SMS gateway response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HologramError::DeliveryError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("📨 Reply sent to {} (status {})", recipient, status);
        Ok(())
    }
}

/// 不實際發送，只寫入日誌
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, message: &str) -> Result<()> {
        tracing::info!("📝 Reply to {} (delivery disabled): {}", recipient, message);
        Ok(())
    }
}
