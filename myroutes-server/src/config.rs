use std::{net::SocketAddr, path::PathBuf, time::Duration};

use myroutes_core::{DEFAULT_CORRIDOR_METERS, LatLng, MAX_MATCH_DISTANCE_METERS};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration, read from TOML. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub cameras_path: PathBuf,
    pub routing: RoutingConfig,
    pub traffic: TrafficConfig,
    pub geocoder: GeocoderConfig,
    pub stream: StreamConfig,
    pub upstream_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
    /// Camera corridor radius in meters
    pub corridor_meters: f64,
    pub max_match_distance_meters: f64,
    pub default_origin: LatLng,
    pub default_destination: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    pub base_url: String,
    pub profile: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrafficConfig {
    pub base_url: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    pub timeout_secs: u64,
    /// Hosts that reject browser-like headers and often hang
    pub slow_hosts: Vec<String>,
    pub slow_timeout_secs: u64,
    pub referer: String,
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cameras_path: PathBuf::from("data/cctvs.json"),
            routing: RoutingConfig::default(),
            traffic: TrafficConfig::default(),
            geocoder: GeocoderConfig::default(),
            stream: StreamConfig::default(),
            upstream_timeout_secs: 10,
            request_timeout_secs: 60,
            concurrency_limit: 256,
            corridor_meters: DEFAULT_CORRIDOR_METERS,
            max_match_distance_meters: MAX_MATCH_DISTANCE_METERS,
            // central Bandung to Soreang
            default_origin: LatLng::new(-6.894242955170832, 107.63662774808225),
            default_destination: LatLng::new(-7.001763102205302, 107.56769773144025),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
        }
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com".to_string(),
            access_token: None,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://us1.locationiq.com".to_string(),
            api_key: None,
            limit: 5,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            slow_hosts: vec!["cctv.bandungkab.go.id".to_string()],
            slow_timeout_secs: 8,
            referer: "https://pelindung.bandung.go.id/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Fills API credentials missing from the file from `MAPBOX_API_KEY` and
    /// `LOCATIONIQ_API_KEY`.
    #[must_use]
    pub fn with_env_credentials(mut self) -> Self {
        if self.traffic.access_token.is_none() {
            self.traffic.access_token = std::env::var("MAPBOX_API_KEY").ok();
        }
        if self.geocoder.api_key.is_none() {
            self.geocoder.api_key = std::env::var("LOCATIONIQ_API_KEY").ok();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("corridor_meters", self.corridor_meters),
            ("max_match_distance_meters", self.max_match_distance_meters),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        for (name, secs) in [
            ("upstream_timeout_secs", self.upstream_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
            ("stream.timeout_secs", self.stream.timeout_secs),
            ("stream.slow_timeout_secs", self.stream.slow_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }

        if self.concurrency_limit == 0 {
            return Err(ConfigError::Invalid(
                "concurrency_limit must be positive".to_string(),
            ));
        }

        if !self.default_origin.is_finite() || !self.default_destination.is_finite() {
            return Err(ConfigError::Invalid(
                "Default origin and destination must be finite".to_string(),
            ));
        }

        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
