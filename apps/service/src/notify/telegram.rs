use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

use crate::config::TelegramConfig;

use super::Notifier;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload of the Telegram Bot API sendMessage method.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Sends alerts and health reports through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    send_message_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Self::with_api_base(TELEGRAM_API_BASE, config)
    }

    /// Point the notifier at a different API host. Used by tests.
    pub fn with_api_base(base: &str, config: &TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;

        Ok(Self {
            client,
            send_message_url: format!("{}/bot{}/sendMessage", base, config.bot_token),
            chat_id: config.chat_id.clone(),
        })
    }

    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage { chat_id: &self.chat_id, text };

        let response = self.client.post(&self.send_message_url).json(&payload).send().await?;

        if !response.status().is_success() {
            bail!("status code {}", response.status().as_u16());
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn alert(&self, endpoint: &str) {
        let message = format!("⚠️ Alert: Endpoint {endpoint} is DOWN!");

        match self.send(&message).await {
            Ok(()) => info!("Sent alert for endpoint {}", endpoint),
            Err(error) => error!("Failed to send alert for endpoint {}: {}", endpoint, error),
        }
    }

    async fn report(&self, text: &str) {
        match self.send(text).await {
            Ok(()) => info!("Sent health report"),
            Err(error) => error!("Failed to send health report: {}", error),
        }
    }
}
