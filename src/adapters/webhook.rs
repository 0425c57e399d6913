//! Webhook notifier adapter.
//!
//! Posts `{"text": message}` to a chat-style incoming webhook.  With no
//! webhook configured the message only goes to the log.

use log::{info, warn};
use reqwest::blocking::Client;
use serde::Serialize;

use crate::app::ports::NotifierPort;
use crate::config::SystemConfig;
use crate::error::{Error, Result};

use super::utils::{build_client, classify};

#[derive(Serialize)]
struct Payload<'a> {
    text: &'a str,
}

/// [`NotifierPort`] that delivers alerts to an HTTP webhook.
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(config: &SystemConfig) -> Result<Self> {
        let url = config
            .notify_webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_owned);
        if url.is_none() {
            warn!("No notify_webhook_url configured; switch alerts are logged only");
        }
        Ok(Self {
            client: build_client(config.request_timeout())?,
            url,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

impl NotifierPort for WebhookNotifier {
    fn notify(&mut self, message: &str) -> Result<()> {
        info!("ALERT | {message}");
        let Some(url) = &self.url else {
            return Ok(());
        };

        let status = self
            .client
            .post(url)
            .json(&Payload { text: message })
            .send()
            .map_err(|e| Error::notify(classify("webhook", &e).to_string()))?
            .status();

        if status.is_success() {
            Ok(())
        } else {
            Err(Error::notify(format!("webhook answered {status}")))
        }
    }
}
