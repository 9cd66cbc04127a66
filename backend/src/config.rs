//! Application configuration.
//!
//! Settings are read from a TOML file (every key optional) and then
//! overridden by environment variables.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [areas]
//! geojson_path = "data/wilayah_perairan.json"
//!
//! [overview]
//! url = "https://maritim.bmkg.go.id/public_api/overview/gelombang.json"
//! timeout_secs = 10
//! fallback = "empty"
//!
//! [map]
//! center_lat = -1.1744305
//! center_lon = 116.7717081
//! zoom = 5
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::LonLat;
use crate::page::OverviewFallback;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::overview::DEFAULT_OVERVIEW_URL;
use crate::widget::{MapProps, DEFAULT_CENTER, DEFAULT_ZOOM};

/// Full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub areas: AreaSettings,
    #[serde(default)]
    pub overview: OverviewSettings,
    #[serde(default)]
    pub map: MapSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Static area layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaSettings {
    #[serde(default = "default_geojson_path")]
    pub geojson_path: PathBuf,
}

/// Wave-overview feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewSettings {
    #[serde(default = "default_overview_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `empty` to continue with an empty overview when the feed fails, `fail` to abort startup.
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

/// Initial map view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_geojson_path() -> PathBuf {
    PathBuf::from("data/wilayah_perairan.json")
}

fn default_overview_url() -> String {
    DEFAULT_OVERVIEW_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_fallback() -> String {
    "empty".to_string()
}

fn default_center_lat() -> f64 {
    DEFAULT_CENTER.lat
}

fn default_center_lon() -> f64 {
    DEFAULT_CENTER.lon
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AreaSettings {
    fn default() -> Self {
        Self {
            geojson_path: default_geojson_path(),
        }
    }
}

impl Default for OverviewSettings {
    fn default() -> Self {
        Self {
            url: default_overview_url(),
            timeout_secs: default_timeout_secs(),
            fallback: default_fallback(),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            zoom: default_zoom(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `geojson_path` (including the default) is resolved against
    /// the directory holding the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ServiceError::Configuration(format!("Failed to read config file: {}", e)))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| ServiceError::Configuration(format!("Failed to parse config file: {}", e)))?;
        if let Some(dir) = path.parent() {
            config.areas.geojson_path = dir.join(&config.areas.geojson_path);
        }
        Ok(config)
    }

    /// Load `maritime.toml` from the first standard location that has one,
    /// or built-in defaults when none does, then apply environment overrides.
    pub fn load() -> ServiceResult<Self> {
        let search_paths = [
            PathBuf::from("maritime.toml"),
            PathBuf::from("backend/maritime.toml"),
            PathBuf::from("../maritime.toml"),
        ];

        let mut config = match search_paths.iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings from the environment.
    ///
    /// # Environment Variables
    /// - `HOST`, `PORT`: listener address
    /// - `GEOJSON_PATH`: static area file, relative to the working directory
    /// - `OVERVIEW_URL`: wave-overview feed
    /// - `OVERVIEW_TIMEOUT_SECS`: feed timeout in seconds
    /// - `OVERVIEW_FALLBACK`: `empty` | `fail`
    pub fn apply_env_overrides(&mut self) -> ServiceResult<()> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ServiceError::Configuration("PORT must be a valid port number".to_string()))?;
        }
        if let Ok(path) = env::var("GEOJSON_PATH") {
            self.areas.geojson_path = PathBuf::from(path);
        }
        if let Ok(url) = env::var("OVERVIEW_URL") {
            self.overview.url = url;
        }
        if let Ok(secs) = env::var("OVERVIEW_TIMEOUT_SECS") {
            self.overview.timeout_secs = secs.parse().map_err(|_| {
                ServiceError::Configuration("OVERVIEW_TIMEOUT_SECS must be a whole number".to_string())
            })?;
        }
        if let Ok(fallback) = env::var("OVERVIEW_FALLBACK") {
            self.overview.fallback = fallback;
        }
        // Reject a bad fallback early rather than at startup fetch time.
        self.overview_fallback()?;
        Ok(())
    }

    pub fn overview_timeout(&self) -> Duration {
        Duration::from_secs(self.overview.timeout_secs)
    }

    pub fn overview_fallback(&self) -> ServiceResult<OverviewFallback> {
        OverviewFallback::from_str(&self.overview.fallback).map_err(ServiceError::Configuration)
    }

    /// Widget props for the configured initial view.
    pub fn map_props(&self) -> MapProps {
        MapProps {
            center: LonLat::new(self.map.center_lon, self.map.center_lat),
            zoom: self.map.zoom,
            ..MapProps::default()
        }
    }
}
