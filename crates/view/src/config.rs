use std::env;
use std::path::{Path, PathBuf};

use foundation::LatLon;
use layers::{MapControllerConfig, MapOptions};
use runtime::RetryPolicy;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub initial_delay_ms: u32,
    pub factor: f64,
    pub max_delay_ms: u32,
    /// `null` polls forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            initial_delay_ms: p.initial_delay_ms,
            factor: p.factor,
            max_delay_ms: p.max_delay_ms,
            max_attempts: p.max_attempts,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay_ms: self.initial_delay_ms,
            factor: self.factor,
            max_delay_ms: self.max_delay_ms,
            max_attempts: self.max_attempts,
        }
    }
}

/// Dashboard settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_key: String,
    pub map_container: String,
    pub map_style: String,
    pub map_zoom: f64,
    /// Zoom applied after a successful geolocation.
    pub locate_zoom: f64,
    pub popup_offset_px: u32,
    pub default_lat: f64,
    pub default_lon: f64,
    /// Delay between showing the map section and constructing the map.
    pub map_init_delay_ms: u32,
    pub resize_delay_ms: u32,
    pub sdk_retry: RetryConfig,
    /// Base URL of the data API; used by the HTTP providers.
    pub api_base: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_key: "demo".to_string(),
            map_container: "map".to_string(),
            map_style: "tomtom://vector/1/basic-main".to_string(),
            map_zoom: 13.0,
            locate_zoom: 15.0,
            popup_offset_px: 35,
            default_lat: LatLon::PUNE.lat,
            default_lon: LatLon::PUNE.lon,
            map_init_delay_ms: 100,
            resize_delay_ms: 300,
            sdk_retry: RetryConfig::default(),
            api_base: "/api".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reads `GEOSENSE_CONFIG` (a JSON file) if set, then applies the
    /// single-value overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = match env::var("GEOSENSE_CONFIG") {
            Ok(path) => {
                info!(%path, "loading config");
                Self::load(Path::new(&path))?
            }
            Err(_) => Self::default(),
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = env::var("GEOSENSE_API_KEY") {
            self.api_key = key;
        }
        if let Ok(base) = env::var("GEOSENSE_API_BASE") {
            self.api_base = base;
        }
        self.map_zoom = env_var_f64("GEOSENSE_MAP_ZOOM", self.map_zoom);
        self.map_init_delay_ms = env_var_u32("GEOSENSE_MAP_INIT_DELAY_MS", self.map_init_delay_ms);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, zoom) in [("map_zoom", self.map_zoom), ("locate_zoom", self.locate_zoom)] {
            if !(0.0..=22.0).contains(&zoom) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=22, got {zoom}"
                )));
            }
        }
        if !(-90.0..=90.0).contains(&self.default_lat)
            || !(-180.0..=180.0).contains(&self.default_lon)
        {
            return Err(ConfigError::Invalid(format!(
                "default position {}, {} is out of range",
                self.default_lat, self.default_lon
            )));
        }
        if self.sdk_retry.factor < 1.0 {
            return Err(ConfigError::Invalid(
                "sdk_retry.factor must be at least 1".to_string(),
            ));
        }
        if self.map_container.trim().is_empty() {
            return Err(ConfigError::Invalid("map_container is empty".to_string()));
        }
        Ok(())
    }

    pub fn default_position(&self) -> LatLon {
        LatLon::new(self.default_lat, self.default_lon)
    }

    pub fn map_controller_config(&self) -> MapControllerConfig {
        MapControllerConfig {
            options: MapOptions {
                api_key: self.api_key.clone(),
                container_id: self.map_container.clone(),
                center: self.default_position(),
                zoom: self.map_zoom,
                style: self.map_style.clone(),
            },
            sdk_retry: self.sdk_retry.policy(),
            popup_offset_px: self.popup_offset_px,
            resize_delay_ms: self.resize_delay_ms,
        }
    }
}

fn env_var_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ConfigError, DashboardConfig};

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DashboardConfig::from_json("{}").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn partial_override() {
        let c = DashboardConfig::from_json(
            r#"{"api_key": "k", "sdk_retry": {"max_attempts": 3}}"#,
        )
        .unwrap();
        assert_eq!(c.api_key, "k");
        assert_eq!(c.sdk_retry.max_attempts, Some(3));
        assert_eq!(c.sdk_retry.initial_delay_ms, 100);
        assert_eq!(c.map_zoom, 13.0);
    }

    #[test]
    fn controller_config_carries_map_options() {
        let c = DashboardConfig::default().map_controller_config();
        assert_eq!(c.options.container_id, "map");
        assert_eq!(c.options.zoom, 13.0);
        assert_eq!(c.popup_offset_px, 35);
        assert_eq!(c.resize_delay_ms, 300);
        assert_eq!(c.sdk_retry.delay_for(1), Some(100));
    }

    #[test]
    fn out_of_range_zoom_is_rejected() {
        let err = DashboardConfig::from_json(r#"{"map_zoom": 40}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_position_is_rejected() {
        let err = DashboardConfig::from_json(r#"{"default_lat": 123.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            DashboardConfig::from_json("{").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
