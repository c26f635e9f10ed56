//! Records for the OpenWeatherMap One Call 3.0 payload.
//!
//! The payload is requested with `units=standard`, so every raw number is in
//! a base unit: kelvin, metres per second, metres, hectopascals. The accessor
//! methods tag those numbers with their unit so layout code converts them
//! explicitly. Fields the provider omits deserialize to zero or empty.

use crate::chart::ChartSample;
use crate::units::{Distance, Pressure, Quantity, Speed, Temperature};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneCall {
    pub lat: f32,
    pub lon: f32,
    pub timezone: String,
    /// Shift in seconds from UTC.
    pub timezone_offset: i32,
    pub current: Current,
    pub hourly: Vec<Hourly>,
    pub daily: Vec<Daily>,
    pub alerts: Vec<Alert>,
}

impl OneCall {
    /// The report's UTC offset; out-of-range offsets fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset).unwrap_or(utc_offset())
    }

    /// The first `limit` hourly entries as chart samples.
    pub fn chart_samples(&self, limit: usize) -> Vec<ChartSample> {
        self.hourly.iter().take(limit).map(Hourly::chart_sample).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Precipitation volume over the last hour, in mm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastHour {
    #[serde(rename = "1h")]
    pub one_hour: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Current {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: f32,
    pub feels_like: f32,
    pub pressure: f32,
    pub humidity: f32,
    pub dew_point: f32,
    pub clouds: f32,
    pub uvi: f32,
    pub visibility: f32,
    pub wind_speed: f32,
    pub wind_gust: f32,
    pub wind_deg: f32,
    pub rain: Option<LastHour>,
    pub snow: Option<LastHour>,
    pub weather: Vec<Condition>,
}

impl Current {
    pub fn temperature(&self) -> Quantity<Temperature> {
        Quantity::new(self.temp, Temperature::Kelvin)
    }

    pub fn feels_like(&self) -> Quantity<Temperature> {
        Quantity::new(self.feels_like, Temperature::Kelvin)
    }

    pub fn dew_point(&self) -> Quantity<Temperature> {
        Quantity::new(self.dew_point, Temperature::Kelvin)
    }

    pub fn pressure(&self) -> Quantity<Pressure> {
        Quantity::new(self.pressure, Pressure::Hectopascals)
    }

    pub fn visibility(&self) -> Quantity<Distance> {
        Quantity::new(self.visibility, Distance::Meters)
    }

    pub fn wind_speed(&self) -> Quantity<Speed> {
        Quantity::new(self.wind_speed, Speed::MetersPerSecond)
    }

    /// Description of the primary condition, if any.
    pub fn summary(&self) -> Option<&str> {
        self.weather.first().map(|c| c.description.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hourly {
    pub dt: i64,
    pub temp: f32,
    pub feels_like: f32,
    pub pressure: f32,
    pub humidity: f32,
    pub dew_point: f32,
    pub clouds: f32,
    pub uvi: f32,
    pub visibility: f32,
    pub wind_speed: f32,
    pub wind_gust: f32,
    pub wind_deg: f32,
    /// Probability of precipitation, `0.0..=1.0`.
    pub pop: f32,
    pub rain: Option<LastHour>,
    pub snow: Option<LastHour>,
}

impl Hourly {
    pub fn temperature(&self) -> Quantity<Temperature> {
        Quantity::new(self.temp, Temperature::Kelvin)
    }

    pub fn chart_sample(&self) -> ChartSample {
        ChartSample::new(self.dt, self.temperature(), self.pop)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyTemp {
    pub morn: f32,
    pub day: f32,
    pub eve: f32,
    pub night: f32,
    pub min: f32,
    pub max: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Daily {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub moonrise: i64,
    pub moonset: i64,
    pub moon_phase: f32,
    pub temp: DailyTemp,
    pub pressure: f32,
    pub humidity: f32,
    pub dew_point: f32,
    pub clouds: f32,
    pub uvi: f32,
    pub wind_speed: f32,
    pub wind_gust: f32,
    pub wind_deg: f32,
    pub pop: f32,
    pub rain: f32,
    pub snow: f32,
    pub weather: Vec<Condition>,
}

impl Daily {
    pub fn min(&self) -> Quantity<Temperature> {
        Quantity::new(self.temp.min, Temperature::Kelvin)
    }

    pub fn max(&self) -> Quantity<Temperature> {
        Quantity::new(self.temp.max, Temperature::Kelvin)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub sender_name: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    pub description: String,
    pub tags: Vec<String>,
}

/// Response of the provider's air pollution endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirPollution {
    pub coord: Coord,
    pub list: Vec<AirSample>,
}

impl AirPollution {
    /// Air Quality Index of the newest sample, `1` (good) to `5` (very poor).
    /// Out-of-scale values are treated as missing.
    pub fn aqi(&self) -> Option<u8> {
        self.list
            .iter()
            .max_by_key(|sample| sample.dt)
            .map(|sample| sample.main.aqi)
            .filter(|aqi| (1..=5).contains(aqi))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coord {
    pub lat: f32,
    pub lon: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirSample {
    pub dt: i64,
    pub main: AirIndex,
    pub components: AirComponents,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirIndex {
    pub aqi: u8,
}

/// Pollutant concentrations in µg/m³.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirComponents {
    pub co: f32,
    pub no: f32,
    pub no2: f32,
    pub o3: f32,
    pub so2: f32,
    pub pm2_5: f32,
    pub pm10: f32,
    pub nh3: f32,
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn to_local(timestamp: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

/// Format a Unix timestamp with a strftime `pattern` at `offset`.
///
/// An invalid pattern yields an empty string instead of panicking.
pub fn format_timestamp(timestamp: i64, offset: FixedOffset, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", to_local(timestamp, offset).format(pattern)).is_err() {
        out.clear();
    }
    out
}
