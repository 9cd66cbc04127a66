//! Area data service: the static sea-area layer and the sources the map loads it through.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use serde_json::Value;

use super::error::{ServiceError, ServiceResult};
use crate::models::{FeatureCollection, REGION_CODE_PROPERTY};

/// Where the map widget loads its area polygons from.
#[async_trait]
pub trait AreaSource: Send + Sync {
    /// The whole area layer.
    async fn fetch_all(&self) -> ServiceResult<FeatureCollection>;

    /// Areas whose region code equals `code`; empty when none match.
    async fn fetch_by_code(&self, code: &str) -> ServiceResult<FeatureCollection>;
}

/// Read-only access to the static GeoJSON area file.
///
/// The file is re-read on every call. It is small and never changes while the
/// server runs, so there is no cache to invalidate.
///
/// [`get_all_areas`](Self::get_all_areas) and
/// [`get_areas_by_code`](Self::get_areas_by_code) return the document as raw
/// JSON so every member of the file reaches the client. The [`AreaSource`]
/// impl decodes it into the typed model for the map widget.
#[derive(Debug, Clone)]
pub struct AreaService {
    path: PathBuf,
}

impl AreaService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }

    /// The entire static document, as stored.
    pub fn get_all_areas(&self) -> ServiceResult<Value> {
        let source = self.source();
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ServiceError::unavailable(&source, format!("Failed to read area file: {}", e)))?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| ServiceError::unavailable(&source, format!("Failed to parse area file: {}", e)))?;
        if !document.get("features").is_some_and(Value::is_array) {
            return Err(ServiceError::unavailable(
                &source,
                "Area file has no features array",
            ));
        }
        debug!("Loaded {} areas from {}", feature_count(&document), source);
        Ok(document)
    }

    /// The document with only the features whose `WP_1` equals `code`.
    pub fn get_areas_by_code(&self, code: &str) -> ServiceResult<Value> {
        let mut document = self.get_all_areas()?;
        retain_code(&mut document, code);
        Ok(document)
    }

    /// The whole layer decoded for the map widget.
    pub fn load_collection(&self) -> ServiceResult<FeatureCollection> {
        let document = self.get_all_areas()?;
        serde_json::from_value(document)
            .map_err(|e| ServiceError::unavailable(self.source(), format!("Failed to decode area file: {}", e)))
    }
}

/// Number of entries in a document's `features` array.
pub fn feature_count(document: &Value) -> usize {
    document
        .get("features")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Drops the features of a raw document whose region code is not `code`.
/// Order and every other member are kept.
pub fn retain_code(document: &mut Value, code: &str) {
    if let Some(Value::Array(features)) = document.get_mut("features") {
        features.retain(|feature| {
            feature
                .get("properties")
                .and_then(|properties| properties.get(REGION_CODE_PROPERTY))
                .and_then(Value::as_str)
                == Some(code)
        });
    }
}

/// Keeps the features whose region code equals `code`, preserving order and
/// the collection's other members.
pub fn filter_by_code(collection: &FeatureCollection, code: &str) -> FeatureCollection {
    let features = collection
        .features
        .iter()
        .filter(|feature| feature.region_code() == Some(code))
        .cloned()
        .collect();
    collection.with_features(features)
}

#[async_trait]
impl AreaSource for AreaService {
    async fn fetch_all(&self) -> ServiceResult<FeatureCollection> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.load_collection())
            .await
            .map_err(|e| ServiceError::unavailable(self.source(), format!("Task join error: {}", e)))?
    }

    async fn fetch_by_code(&self, code: &str) -> ServiceResult<FeatureCollection> {
        Ok(filter_by_code(&self.fetch_all().await?, code))
    }
}

/// Loads areas from a running server's `/api/geojson-area` endpoints.
#[derive(Debug, Clone)]
pub struct HttpAreaClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpAreaClient {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> ServiceResult<Self> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|e| {
            ServiceError::Configuration(format!("Invalid area server URL '{}': {}", base_url.as_ref(), e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Configuration(format!(
                "Area server URL '{}' cannot have a path",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::fetch(base_url.as_str(), format!("http client init failed: {}", e)))?;
        Ok(Self { base_url, client })
    }

    /// `{base}/api/geojson-area[/{code}]`, with `code` percent-encoded as one segment.
    fn endpoint(&self, code: Option<&str>) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ServiceError::Configuration(format!("Area server URL '{}' cannot have a path", self.base_url))
            })?;
            segments.pop_if_empty().extend(["api", "geojson-area"]);
            if let Some(code) = code {
                segments.push(code);
            }
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> ServiceResult<FeatureCollection> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ServiceError::fetch(url.as_str(), e))?;

        if !response.status().is_success() {
            return Err(ServiceError::fetch(url.as_str(), format!("HTTP {}", response.status())));
        }

        response
            .json::<FeatureCollection>()
            .await
            .map_err(|e| ServiceError::fetch(url.as_str(), format!("invalid GeoJSON: {}", e)))
    }
}

#[async_trait]
impl AreaSource for HttpAreaClient {
    async fn fetch_all(&self) -> ServiceResult<FeatureCollection> {
        self.get(self.endpoint(None)?).await
    }

    async fn fetch_by_code(&self, code: &str) -> ServiceResult<FeatureCollection> {
        self.get(self.endpoint(Some(code))?).await
    }
}
