use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::{EewPayload, EewRecord, QuakePayload, QuakeRecord, TsunamiPayload, TsunamiRecord};

const QUAKE_CODE: u16 = 551;
const TSUNAMI_CODE: u16 = 552;
const EEW_CODE: u16 = 556;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn history_url(&self, code: u16) -> String {
        format!("{}/history?codes={}&limit=1", self.base_url, code)
    }

    /// Newest earthquake report, or `None` when the feed is empty.
    pub async fn get_latest_quake(&self) -> Result<Option<QuakeRecord>> {
        self.get_latest::<QuakePayload>(QUAKE_CODE)
            .await?
            .map(QuakePayload::into_record)
            .transpose()
            .context("Failed to normalize earthquake report")
    }

    pub async fn get_latest_tsunami(&self) -> Result<Option<TsunamiRecord>> {
        self.get_latest::<TsunamiPayload>(TSUNAMI_CODE)
            .await?
            .map(TsunamiPayload::into_record)
            .transpose()
            .context("Failed to normalize tsunami forecast")
    }

    pub async fn get_latest_eew(&self) -> Result<Option<EewRecord>> {
        self.get_latest::<EewPayload>(EEW_CODE)
            .await?
            .map(EewPayload::into_record)
            .transpose()
            .context("Failed to normalize early warning")
    }

    /// Fetch one feed and decode only its first list item.
    async fn get_latest<T: DeserializeOwned>(&self, code: u16) -> Result<Option<T>> {
        let url = self.history_url(code);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request for feed {}", code))?
            .error_for_status()
            .with_context(|| format!("Feed {} returned an error status", code))?;

        let body = response
            .json::<serde_json::Value>()
            .await
            .with_context(|| format!("Failed to parse feed {} response", code))?;

        first_item(body).with_context(|| format!("Malformed item in feed {}", code))
    }
}

/// Decode the newest entry of a feed body. Empty or non-list bodies yield `None`.
pub fn first_item<T: DeserializeOwned>(body: serde_json::Value) -> Result<Option<T>> {
    let serde_json::Value::Array(items) = body else {
        return Ok(None);
    };

    match items.into_iter().next() {
        Some(item) => Ok(Some(serde_json::from_value(item)?)),
        None => Ok(None),
    }
}
