//! # Offline Weather Model
//!
//! When the provider is unreachable the display still needs something to
//! draw. This module synthesises a plausible snapshot from the clock alone:
//!
//! - **Temperature**: a diurnal sine around 15 °C with a 5 K amplitude,
//!   coolest at 03:00 UTC and warmest at 15:00 UTC
//! - **Precipitation probability**: a slow oscillation between 0 and 1 with
//!   an 18 hour period, so the chart's stipple bands are exercised
//! - **Forecast**: eight days whose extremes follow the same model, drifting
//!   slightly from day to day
//! - **Air quality**: a constant "Fair" index
//!
//! The result is deterministic for a given instant and always marked
//! `offline`, which the status bar turns into an "Offline data" notice.

use crate::weather::{
    AirIndex, AirPollution, AirSample, Condition, Current, Daily, DailyTemp, Hourly, OneCall,
};
use crate::WeatherSnapshot;
use chrono::{DateTime, Utc};
use std::f32::consts::TAU;

pub const HOURLY_SAMPLES: usize = 48;
pub const DAILY_SAMPLES: usize = 8;
/// "Fair" on the provider's five step scale.
pub const AIR_QUALITY_INDEX: u8 = 2;

const HOUR: i64 = 3600;
const DAY: i64 = 24 * HOUR;

const MEAN_K: f32 = 288.15;
const DIURNAL_AMPLITUDE_K: f32 = 5.0;
const WARMEST_HOUR_UTC: f32 = 15.0;
const DAILY_DRIFT_K: f32 = 0.8;
const PRECIP_PERIOD_HOURS: f32 = 18.0;

fn temperature_at(timestamp: i64) -> f32 {
    let hour_of_day = timestamp.rem_euclid(DAY) as f32 / HOUR as f32;
    let day_index = timestamp.div_euclid(DAY) as f32;
    let phase = (hour_of_day - WARMEST_HOUR_UTC + 6.0) / 24.0 * TAU;
    MEAN_K + DAILY_DRIFT_K * (day_index * 0.9).sin() + DIURNAL_AMPLITUDE_K * phase.sin()
}

fn precipitation_at(hours_ahead: usize) -> f32 {
    0.5 - 0.5 * (hours_ahead as f32 / PRECIP_PERIOD_HOURS * TAU).cos()
}

fn condition(description: &str) -> Vec<Condition> {
    vec![Condition {
        id: 802,
        main: "Clouds".to_string(),
        description: description.to_string(),
        icon: "03d".to_string(),
    }]
}

/// Generate a synthetic snapshot anchored at the top of the current hour.
/// If `now` is `None`, fall back to `Utc::now()`.
pub fn approximate(now: Option<DateTime<Utc>>) -> WeatherSnapshot {
    let now = now.unwrap_or_else(Utc::now).timestamp();
    let start = now - now.rem_euclid(HOUR);
    let midnight = now - now.rem_euclid(DAY);

    let hourly: Vec<Hourly> = (0..HOURLY_SAMPLES)
        .map(|h| {
            let dt = start + h as i64 * HOUR;
            let temp = temperature_at(dt);
            Hourly {
                dt,
                temp,
                feels_like: temp - 1.0,
                pressure: 1013.0,
                humidity: 65.0,
                dew_point: temp - 6.0,
                visibility: 10_000.0,
                wind_speed: 3.0,
                pop: precipitation_at(h),
                ..Default::default()
            }
        })
        .collect();

    let daily = (0..DAILY_SAMPLES)
        .map(|d| {
            let day = midnight + d as i64 * DAY;
            // Coolest and warmest hours of the model.
            let min = temperature_at(day + 3 * HOUR);
            let max = temperature_at(day + 15 * HOUR);
            Daily {
                dt: day + 12 * HOUR,
                sunrise: day + 6 * HOUR + 30 * 60,
                sunset: day + 18 * HOUR + 30 * 60,
                temp: DailyTemp {
                    morn: temperature_at(day + 9 * HOUR),
                    day: max,
                    eve: temperature_at(day + 21 * HOUR),
                    night: min,
                    min,
                    max,
                },
                pressure: 1013.0,
                humidity: 65.0,
                pop: precipitation_at(d * 24),
                weather: condition("estimated"),
                ..Default::default()
            }
        })
        .collect::<Vec<_>>();

    let temp = temperature_at(now);
    let current = Current {
        dt: now,
        sunrise: daily[0].sunrise,
        sunset: daily[0].sunset,
        temp,
        feels_like: temp - 1.0,
        pressure: 1013.0,
        humidity: 65.0,
        dew_point: temp - 6.0,
        clouds: 40.0,
        uvi: 2.0,
        visibility: 10_000.0,
        wind_speed: 3.0,
        wind_deg: 225.0,
        weather: condition("estimated conditions"),
        ..Default::default()
    };

    WeatherSnapshot {
        report: OneCall {
            timezone: "UTC".to_string(),
            timezone_offset: 0,
            current,
            hourly,
            daily,
            ..Default::default()
        },
        air_quality: AirPollution {
            list: vec![AirSample {
                dt: start,
                main: AirIndex {
                    aqi: AIR_QUALITY_INDEX,
                },
                ..Default::default()
            }],
            ..Default::default()
        },
        offline: true,
    }
}
