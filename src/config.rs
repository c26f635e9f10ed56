//! # Configuration Management
//!
//! Loads runtime settings from `weather-config.toml`: the forecast location,
//! provider access, display units and panel layout options. Every section and
//! field has a default, so a partial file only overrides what it names and a
//! missing or malformed file yields [`Config::default`].

use crate::units::{Distance, Pressure, Speed, Temperature};
use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, relative to the working directory.
pub const CONFIG_FILE: &str = "weather-config.toml";

/// Application configuration loaded from weather-config.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub api: ApiConfig,
    pub units: UnitsConfig,
    pub display: DisplayConfig,
}

/// Where the forecast is for
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Name shown in the top right corner
    pub name: String,
    pub latitude: f32,
    pub longitude: f32,
    /// Provider language code for condition descriptions
    pub language: String,
}

/// OpenWeatherMap access
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key; the `OWM_API_KEY` environment variable is used when empty
    pub key: String,
    /// One Call 3.0 endpoint
    pub url: String,
    /// Air pollution endpoint, queried for the Air Quality Index
    pub air_pollution_url: String,
    /// Response cache file, cleared on reboot when under /tmp
    pub cache_path: PathBuf,
    pub cache_ttl_minutes: u64,
    pub timeout_seconds: u64,
}

/// Units used for display; provider data is always converted from base units
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UnitsConfig {
    pub temperature: Temperature,
    pub distance: Distance,
    pub speed: Speed,
    pub pressure: Pressure,
}

/// Panel geometry and formatting
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// strftime pattern for chart time labels
    pub hour_format: String,
    /// strftime pattern for sunrise, sunset and refresh time
    pub time_format: String,
    /// strftime pattern for the date line
    pub date_format: String,
    /// Hourly samples in the outlook chart (at most 48)
    pub graph_hours: usize,
    /// Draw measured text bounds, useful when tuning layout
    pub outline_text: bool,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: "Boston".to_string(),
            latitude: 42.3601,
            longitude: -71.0589,
            language: "en".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            url: "https://api.openweathermap.org/data/3.0/onecall".to_string(),
            air_pollution_url: "https://api.openweathermap.org/data/2.5/air_pollution".to_string(),
            cache_path: PathBuf::from("/tmp/weather_cache.json"),
            cache_ttl_minutes: 30,
            timeout_seconds: 10,
        }
    }
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            temperature: Temperature::Celsius,
            distance: Distance::Kilometers,
            speed: Speed::KilometersPerHour,
            pressure: Pressure::Hectopascals,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,  // 7.5" panel
            height: 480, // 7.5" panel
            hour_format: "%H".to_string(),
            time_format: "%H:%M".to_string(),
            date_format: "%A, %B %-d".to_string(),
            graph_hours: 48,
            outline_text: false,
        }
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration for {}", config.location.name);
                    config
                }
                Err(e) => {
                    warn!("Invalid config file {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save current configuration to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self).context("serializing configuration")?;
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Hourly samples to chart, capped at 48.
    pub fn graph_hours(&self) -> usize {
        self.display.graph_hours.min(48)
    }
}
