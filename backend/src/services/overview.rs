//! Overview fetcher for the remote maritime wave-overview feed.
//!
//! The feed is a JSON object keyed by region code, each entry carrying at
//! least a `today` category:
//!
//! ```json
//! { "A1": { "today": "Tinggi", "tomorrow": "Sedang" }, "B2": { "today": null } }
//! ```
//!
//! Only `today` is consumed.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use super::error::{ServiceError, ServiceResult};
use crate::models::WaveOverview;

/// Public wave-overview feed of the maritime weather service.
pub const DEFAULT_OVERVIEW_URL: &str = "https://maritim.bmkg.go.id/public_api/overview/gelombang.json";

/// Default request timeout for the overview feed.
pub const DEFAULT_OVERVIEW_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can produce the wave overview.
#[async_trait]
pub trait OverviewSource: Send + Sync {
    async fn fetch_overview(&self) -> ServiceResult<WaveOverview>;
}

/// Reduces a raw feed document to `regionCode -> today`.
///
/// Entries whose `today` is missing, null, not a string, or empty are dropped.
/// A root that is not an object yields an empty overview.
pub fn reduce_overview(raw: &Value) -> WaveOverview {
    let Some(entries) = raw.as_object() else {
        return WaveOverview::new();
    };

    entries
        .iter()
        .filter_map(|(code, entry)| {
            entry
                .get("today")
                .and_then(Value::as_str)
                .filter(|today| !today.is_empty())
                .map(|today| (code.as_str(), today))
        })
        .collect()
}

/// Fetches the overview feed over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOverviewFetcher {
    url: String,
    client: reqwest::Client,
}

impl HttpOverviewFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::fetch(&url, format!("http client init failed: {}", e)))?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OverviewSource for HttpOverviewFetcher {
    async fn fetch_overview(&self) -> ServiceResult<WaveOverview> {
        debug!("Fetching wave overview from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::fetch(&self.url, "request timed out")
                } else {
                    ServiceError::fetch(&self.url, e)
                }
            })?;

        if !response.status().is_success() {
            return Err(ServiceError::fetch(
                &self.url,
                format!("HTTP {}", response.status()),
            ));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::fetch(&self.url, format!("invalid JSON: {}", e)))?;

        let overview = reduce_overview(&raw);
        info!("Wave overview loaded with {} regions", overview.len());
        Ok(overview)
    }
}
