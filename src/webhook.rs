// src/webhook.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Serialize, Serializer};
use tracing::{info, instrument};

use crate::leads::FilterCriteria;

pub const DOWNLOAD_MESSAGE: &str = "A new lead has been downloaded.";

/// Body posted to the webhook after every successful download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadEvent {
    pub message: String,
    pub filters: FilterCriteria,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl DownloadEvent {
    pub fn new(filters: FilterCriteria, timestamp: DateTime<Utc>) -> Self {
        Self {
            message: DOWNLOAD_MESSAGE.to_string(),
            filters,
            timestamp,
        }
    }
}

/// `2024-05-01T12:00:00.000Z`
fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Where download events go.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &DownloadEvent) -> Result<()>;
}

/// Posts events as JSON to a fixed URL. Any transport error or non-2xx
/// status is returned to the caller.
pub struct WebhookClient {
    http: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookClient {
    #[instrument(level = "info", skip(self, event))]
    async fn notify(&self, event: &DownloadEvent) -> Result<()> {
        self.http
            .post(&self.url)
            .json(event)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", self.url))?;
        info!("download webhook delivered");
        Ok(())
    }
}
