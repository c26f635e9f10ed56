//! # Weather Data Fetching and Caching
//!
//! Network access for the OpenWeatherMap One Call 3.0 and Air Pollution APIs,
//! with a short-lived response cache so repeated renders during development (or a refresh loop
//! on a small board) do not hit the provider every time.
//!
//! ## Data Source
//!
//! - **Endpoint**: `GET {api.url}?lat=..&lon=..&units=standard&exclude=minutely&lang=..&appid=..`
//! - **Units**: always `standard` (kelvin, m/s, metres, hPa); display units are
//!   applied at render time through [`crate::units`]
//! - **Air quality**: `GET {api.air_pollution_url}?lat=..&lon=..&appid=..`,
//!   deserialized into [`AirPollution`]. A failure here is logged and the
//!   snapshot is rendered without an index
//! - **Format**: JSON, deserialized into [`OneCall`]
//!
//! ## Caching Strategy
//!
//! - **Location**: `api.cache_path`, `/tmp/weather_cache.json` by default
//!   (cleared on reboot)
//! - **TTL**: `api.cache_ttl_minutes`, checked against the file modification
//!   time before the file is read
//! - **Contents**: the report and air quality of a [`WeatherSnapshot`]
//! - **Writes**: best effort; a failed write never fails the fetch
//!
//! ## Error Handling
//!
//! There are no retries. Every failure surfaces as a [`WeatherError`] and the
//! caller is expected to fall back to [`crate::fallback::approximate`].

use crate::config::Config;
use crate::weather::{AirPollution, OneCall};
use crate::WeatherSnapshot;
use log::{debug, info, warn};
use std::path::Path;
use std::time::{Duration, SystemTime};
use std::{env, fs, io};
use thiserror::Error;

/// Environment variable consulted when the config has no API key.
pub const API_KEY_ENV: &str = "OWM_API_KEY";

/// Errors that can occur while obtaining weather data.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// HTTP request failed (network, TLS, timeout, non-success status or
    /// undecodable body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cache body was not a valid snapshot
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Cache file operations failed
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),

    /// Neither the config nor the environment provides an API key
    #[error("no API key configured (set api.key or OWM_API_KEY)")]
    MissingApiKey,
}

/// Fetch the current report from cache or the provider.
///
/// Cache-first: a cache file younger than the TTL is returned without any
/// network access. Otherwise one request is made and the response is cached.
///
/// # Example
/// ```no_run
/// use weather_epd::{config::{Config, CONFIG_FILE}, fallback, weather_data::fetch};
///
/// # async fn run() {
/// let config = Config::load_from_path(CONFIG_FILE);
/// let snapshot = fetch(&config).await.unwrap_or_else(|err| {
///     eprintln!("Failed to fetch weather: {}", err);
///     fallback::approximate(None)
/// });
/// # }
/// ```
pub async fn fetch(config: &Config) -> Result<WeatherSnapshot, WeatherError> {
    let ttl = Duration::from_secs(config.api.cache_ttl_minutes * 60);
    match load_cache(&config.api.cache_path, ttl) {
        Ok(snapshot) => {
            info!("Using cached weather from {}", config.api.cache_path.display());
            return Ok(snapshot);
        }
        Err(e) => debug!("Cache unavailable: {}", e),
    }

    let key = api_key(config).ok_or(WeatherError::MissingApiKey)?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api.timeout_seconds))
        .build()?;

    let report = request(&client, config, &key).await?;
    let air_quality = request_air_quality(&client, config, &key)
        .await
        .unwrap_or_else(|e| {
            warn!("Air quality unavailable: {}", e);
            AirPollution::default()
        });
    let snapshot = WeatherSnapshot::online(report).with_air_quality(air_quality);

    if let Err(e) = save_cache(&config.api.cache_path, &snapshot) {
        warn!("Could not write weather cache: {}", e);
    }

    Ok(snapshot)
}

/// API key from config, falling back to the environment.
fn api_key(config: &Config) -> Option<String> {
    let key = config.api.key.trim();
    if !key.is_empty() {
        return Some(key.to_string());
    }
    env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

async fn request(
    client: &reqwest::Client,
    config: &Config,
    key: &str,
) -> Result<OneCall, WeatherError> {
    info!(
        "Requesting One Call report for {:.4},{:.4}",
        config.location.latitude, config.location.longitude
    );
    let report = client
        .get(&config.api.url)
        .query(&[
            ("lat", config.location.latitude.to_string()),
            ("lon", config.location.longitude.to_string()),
            ("units", "standard".to_string()),
            ("exclude", "minutely".to_string()),
            ("lang", config.location.language.clone()),
            ("appid", key.to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json::<OneCall>()
        .await?;

    Ok(report)
}

async fn request_air_quality(
    client: &reqwest::Client,
    config: &Config,
    key: &str,
) -> Result<AirPollution, WeatherError> {
    debug!("Requesting air pollution");
    let air = client
        .get(&config.api.air_pollution_url)
        .query(&[
            ("lat", config.location.latitude.to_string()),
            ("lon", config.location.longitude.to_string()),
            ("appid", key.to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json::<AirPollution>()
        .await?;

    Ok(air)
}

/// Load the cached snapshot if the file is younger than `ttl`.
fn load_cache(path: &Path, ttl: Duration) -> Result<WeatherSnapshot, WeatherError> {
    let meta = fs::metadata(path)?;

    let age = SystemTime::now()
        .duration_since(meta.modified()?)
        .map_err(|_| io::Error::other("cache modified in the future"))?;

    if age > ttl {
        return Err(io::Error::other("stale").into());
    }

    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

fn save_cache(path: &Path, snapshot: &WeatherSnapshot) -> Result<(), WeatherError> {
    let data = serde_json::to_vec(snapshot)?;
    fs::write(path, data)?;
    Ok(())
}
