//! # Dashboard Layout
//!
//! Composes one full frame from a [`WeatherSnapshot`]:
//!
//! ```text
//! +------------------+----------------------+-----------------------------+
//! | (icon)  21°C     | alerts               |         location / date    |
//! |   Feels like 19° |                      | Mon   Tue   Wed   Thu   Fri |
//! +------------------+----------------------+-----------------------------+
//! | sunrise | sunset                          hourly outlook chart        |
//! | wind    | humidity                                                    |
//! | uv      | pressure                                                    |
//! | aqi     | visibility                                                  |
//! | dew pt  |                                                 status bar  |
//! +---------------------------------------------------------------------- +
//! ```
//!
//! Coordinates are tuned for an 800 x 480 panel. Elements anchored to the
//! right or bottom edge follow the configured size. Weather icons are not
//! drawn; their space is left blank.

use crate::canvas::{Align, Canvas, Painter};
use crate::chart::{draw_outlook_chart, ChartLayout, PlotArea};
use crate::config::{Config, UnitsConfig};
use crate::framebuffer::TriColor;
use crate::scene::{TextItem, Window};
use crate::text::{Font, FONT_HUGE, FONT_LARGE, FONT_MEDIUM, FONT_SMALL, FONT_TINY};
use crate::units::{Distance, Pressure, Quantity, Unit};
use crate::weather::{format_timestamp, AirPollution, Alert, Current, Daily};
use crate::WeatherSnapshot;
use chrono::{DateTime, FixedOffset, Utc};
use embedded_graphics::prelude::*;
use log::{debug, info};

const ICON_LARGE: i32 = 196;
const ICON_GRID: i32 = 48;
const GRID_TOP: i32 = 204;
const GRID_DX: i32 = 170;
const GRID_DY: i32 = ICON_GRID + 8;
/// Baseline of a grid cell's value line.
const GRID_VALUE_Y: i32 = 17 / 2 + ICON_GRID / 2;
const GRID_SPACING: i32 = 8;
const FORECAST_LEFT: i32 = 398;
const FORECAST_DX: i32 = 82;
const FORECAST_DAYS: usize = 5;
const MAX_ALERTS: usize = 2;

pub const TXT_FEELS_LIKE: &str = "Feels like";
pub const TXT_SUNRISE: &str = "Sunrise";
pub const TXT_SUNSET: &str = "Sunset";
pub const TXT_WIND: &str = "Wind";
pub const TXT_HUMIDITY: &str = "Humidity";
pub const TXT_UV_INDEX: &str = "UV Index";
pub const TXT_AIR_QUALITY_INDEX: &str = "Air Quality Index";
pub const TXT_UNAVAILABLE: &str = "--";
pub const TXT_PRESSURE: &str = "Pressure";
pub const TXT_VISIBILITY: &str = "Visibility";
pub const TXT_DEW_POINT: &str = "Dew Point";
pub const TXT_OFFLINE: &str = "Offline data";
pub const TXT_UPDATED: &str = "Updated";

/// Draw the full dashboard for `snapshot`, refreshed at `now`.
pub fn render_dashboard<D>(
    canvas: &mut Canvas<'_, D>,
    snapshot: &WeatherSnapshot,
    config: &Config,
    now: DateTime<Utc>,
) where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    let report = &snapshot.report;
    let offset = report.offset();
    let size = canvas.size();
    info!(
        "Rendering dashboard {}x{} ({} hourly, {} daily, {} alerts{})",
        size.width,
        size.height,
        report.hourly.len(),
        report.daily.len(),
        report.alerts.len(),
        if snapshot.offline { ", offline" } else { "" }
    );

    let city = config.location.name.as_str();
    let date = format_timestamp(now.timestamp(), offset, &config.display.date_format);

    draw_current_conditions(canvas, &report.current, &config.units);
    draw_data_grid(canvas, &report.current, &snapshot.air_quality, config, offset);
    draw_forecast(canvas, &report.daily, &config.units, offset);
    draw_location_date(canvas, city, &date, config.display.outline_text);
    draw_alerts(canvas, &report.alerts, city, &date);

    let samples = report.chart_samples(config.graph_hours());
    let layout = ChartLayout::compute(
        &samples,
        PlotArea::for_screen(size.width, size.height),
        config.units.temperature,
    );
    draw_outlook_chart(canvas, &layout, offset, &config.display.hour_format);

    let refreshed = format_timestamp(now.timestamp(), offset, &config.display.time_format);
    draw_status_bar(canvas, &refreshed, snapshot.offline);
}

fn rounded(value: f32) -> i32 {
    value.round() as i32
}

/// UV index category label.
pub fn uv_description(uvi: u32) -> &'static str {
    match uvi {
        0..=2 => "Low",
        3..=5 => "Moderate",
        6..=7 => "High",
        8..=10 => "Very High",
        _ => "Extreme",
    }
}

/// Air Quality Index label on the provider's scale of 1 to 5.
pub fn aqi_description(aqi: u8) -> &'static str {
    match aqi {
        0..=1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        _ => "Very Poor",
    }
}

/// Capitalise the first letter of every space-separated word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = c.is_whitespace();
    }
    out
}

/// Visibility text: one decimal below 1.95, whole numbers above, and a
/// "> " prefix once the provider's ceiling is reached.
pub fn format_visibility(visibility: Quantity<Distance>, unit: Distance) -> String {
    let value = visibility.in_unit(unit);
    let text = if value < 1.95 {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        rounded(value).to_string()
    };
    if value >= unit.max_visibility() {
        format!("> {text}")
    } else {
        text
    }
}

pub fn format_pressure(pressure: Quantity<Pressure>, unit: Pressure) -> String {
    let precision = unit.display_precision();
    format!("{:.*}", precision, pressure.in_unit(unit))
}

fn draw_current_conditions<D>(canvas: &mut Canvas<'_, D>, current: &Current, units: &UnitsConfig)
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    let unit = units.temperature;
    let centre = ICON_LARGE + 164 / 2;

    canvas.set_text_color(TriColor::Black);
    canvas.set_font(&FONT_HUGE);
    let temp = rounded(current.temperature().in_unit(unit)).to_string();
    canvas.draw_string(centre - 20, 98 + 69 / 2, &temp, Align::Center);
    canvas.set_font(&FONT_LARGE);
    let after = canvas.cursor_x();
    canvas.draw_string(after, 98 - 69 / 2 + 20, unit.symbol(), Align::Left);

    let feels_like = format!(
        "{} {}{}",
        TXT_FEELS_LIKE,
        rounded(current.feels_like().in_unit(unit)),
        unit.short_symbol()
    );
    canvas.set_font(&FONT_MEDIUM);
    canvas.draw_string(centre, 98 + 69 / 2 + 12 + 17, &feels_like, Align::Center);

    if let Some(summary) = current.summary() {
        canvas.set_font(&FONT_SMALL);
        canvas.draw_multiline_string(
            centre,
            98 + 69 / 2 + 12 + 17 + 16,
            &title_case(summary),
            Align::Center,
            160,
            1,
            0,
        );
    }
}

/// Label plus value with a trailing unit, the shape of every grid cell.
fn draw_grid_cell<D>(canvas: &mut Canvas<'_, D>, x: i32, y: i32, label: &str, value: &str, unit: &str)
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    canvas.set_font(&FONT_SMALL);
    canvas.draw_string(x + ICON_GRID, y + 10, label, Align::Left);
    canvas.set_font(&FONT_LARGE);
    canvas.draw_string(x + ICON_GRID, y + GRID_VALUE_Y, value, Align::Left);
    if !unit.is_empty() {
        canvas.set_font(&FONT_SMALL);
        let after = canvas.cursor_x();
        canvas.draw_string(after, y + GRID_VALUE_Y, unit, Align::Left);
    }
}

/// A grid cell whose value is followed by a short description that shrinks
/// to the tiny font, then wraps to two lines, when the column runs out.
fn draw_index_cell<D>(
    canvas: &mut Canvas<'_, D>,
    x: i32,
    y: i32,
    label: &str,
    value: &str,
    description: Option<&str>,
) where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    draw_grid_cell(canvas, x, y, label, value, "");
    let Some(description) = description else {
        return;
    };

    let left = canvas.cursor_x() + GRID_SPACING;
    let max_width = (x + GRID_DX - left).max(0) as u32;
    let value_y = y + GRID_VALUE_Y;

    canvas.set_font(&FONT_SMALL);
    if canvas.font().text_width(description) <= max_width {
        canvas.draw_string(left, value_y, description, Align::Left);
        return;
    }
    canvas.set_font(&FONT_TINY);
    if canvas.font().text_width(description) <= max_width {
        canvas.draw_string(left, value_y, description, Align::Left);
    } else {
        debug!("{label} description {description:?} wrapped to {max_width}px");
        canvas.draw_multiline_string(left, value_y - 10, description, Align::Left, max_width, 2, 10);
    }
}

fn draw_data_grid<D>(
    canvas: &mut Canvas<'_, D>,
    current: &Current,
    air_quality: &AirPollution,
    config: &Config,
    offset: FixedOffset,
) where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    let units = &config.units;
    let time_format = &config.display.time_format;
    let cell = |col: i32, row: i32| (GRID_DX * col, GRID_TOP + GRID_DY * row);
    canvas.set_text_color(TriColor::Black);

    let (x, y) = cell(0, 0);
    let sunrise = format_timestamp(current.sunrise, offset, time_format);
    draw_grid_cell(canvas, x, y, TXT_SUNRISE, &sunrise, "");

    let (x, y) = cell(0, 1);
    let wind = rounded(current.wind_speed().in_unit(units.speed)).to_string();
    draw_grid_cell(canvas, x, y, TXT_WIND, &wind, units.speed.symbol());

    let (x, y) = cell(0, 2);
    let uvi = current.uvi.round().max(0.0) as u32;
    draw_index_cell(canvas, x, y, TXT_UV_INDEX, &uvi.to_string(), Some(uv_description(uvi)));

    let (x, y) = cell(0, 3);
    match air_quality.aqi() {
        Some(aqi) => {
            let description = Some(aqi_description(aqi));
            draw_index_cell(canvas, x, y, TXT_AIR_QUALITY_INDEX, &aqi.to_string(), description);
        }
        None => draw_index_cell(canvas, x, y, TXT_AIR_QUALITY_INDEX, TXT_UNAVAILABLE, None),
    }

    let (x, y) = cell(0, 4);
    let dew_point = rounded(current.dew_point().in_unit(units.temperature)).to_string();
    draw_grid_cell(canvas, x, y, TXT_DEW_POINT, &dew_point, units.temperature.symbol());

    let (x, y) = cell(1, 0);
    let sunset = format_timestamp(current.sunset, offset, time_format);
    draw_grid_cell(canvas, x, y, TXT_SUNSET, &sunset, "");

    let (x, y) = cell(1, 1);
    let humidity = rounded(current.humidity).to_string();
    draw_grid_cell(canvas, x, y, TXT_HUMIDITY, &humidity, "%");

    let (x, y) = cell(1, 2);
    let pressure = format_pressure(current.pressure(), units.pressure);
    draw_grid_cell(canvas, x, y, TXT_PRESSURE, &pressure, units.pressure.symbol());

    let (x, y) = cell(1, 3);
    let visibility = format_visibility(current.visibility(), units.distance);
    draw_grid_cell(canvas, x, y, TXT_VISIBILITY, &visibility, units.distance.symbol());
}

fn draw_forecast<D>(canvas: &mut Canvas<'_, D>, daily: &[Daily], units: &UnitsConfig, offset: FixedOffset)
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    let unit = units.temperature;
    canvas.set_text_color(TriColor::Black);

    for (i, day) in daily.iter().take(FORECAST_DAYS).enumerate() {
        let x = FORECAST_LEFT + i as i32 * FORECAST_DX;

        canvas.set_font(&FONT_MEDIUM);
        let weekday = format_timestamp(day.dt, offset, "%a");
        canvas.draw_string(x + 31 - 2, 98 + 69 / 2 - 32 - 26 - 6 + 16, &weekday, Align::Center);

        let y = 98 + 69 / 2 + 38 - 6 + 12;
        let hi = format!("{}{}", rounded(day.max().in_unit(unit)), unit.short_symbol());
        let lo = format!("{}{}", rounded(day.min().in_unit(unit)), unit.short_symbol());
        canvas.set_font(&FONT_SMALL);
        canvas.draw_string(x + 31 - 4, y, &hi, Align::Right);
        canvas.draw_string(x + 31 + 8, y, &lo, Align::Left);
        canvas.draw_string(x + 31, y, "|", Align::Center);
    }
}

/// Right-aligned text item whose baseline sits at `baseline`.
fn right_aligned(right: i32, baseline: i32, text: &str, font: &'static Font, outline: bool) -> TextItem {
    let mut item = TextItem::new(0, baseline - i32::from(font.y_advance), text, font);
    item.origin.x = right - item.size().width as i32;
    item.outlined(outline)
}

fn draw_location_date<D>(canvas: &mut Canvas<'_, D>, city: &str, date: &str, outline: bool)
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    let size = canvas.size();
    let right = size.width as i32 - 2;

    let location = Window::new()
        .child(right_aligned(right, 23, city, &FONT_HUGE, outline));
    canvas.set_text_color(TriColor::Red);
    location.paint(canvas);

    let dated = Window::new()
        .child(right_aligned(right, 30 + 4 + 17, date, &FONT_LARGE, outline));
    canvas.set_text_color(TriColor::Black);
    dated.paint(canvas);
}

fn draw_alerts<D>(canvas: &mut Canvas<'_, D>, alerts: &[Alert], city: &str, date: &str)
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    if alerts.is_empty() {
        return;
    }

    // Keep clear of the location and date strings.
    let widest = FONT_HUGE.text_width(city).max(FONT_LARGE.text_width(date)) as i32;
    let mut max_width = canvas.size().width as i32 - 2 - widest - (ICON_LARGE + 4) - 8;
    canvas.set_text_color(TriColor::Black);

    if alerts.len() == 1 {
        max_width -= 48;
        let max_width = max_width.max(0) as u32;
        let event = title_case(&alerts[0].event);
        let x = ICON_LARGE + 48 + 4;

        canvas.set_font(&FONT_MEDIUM);
        if canvas.font().text_width(&event) <= max_width {
            canvas.draw_string(x, 24 + 8 - 12 + 20 + 1, &event, Align::Left);
            return;
        }
        canvas.set_font(&FONT_SMALL);
        if canvas.font().text_width(&event) <= max_width {
            canvas.draw_string(x, 24 + 8 - 12 + 17 + 1, &event, Align::Left);
        } else {
            debug!("alert {event:?} wrapped to {max_width}px");
            canvas.draw_multiline_string(x, 24 + 8 - 12 + 17 - 11, &event, Align::Left, max_width, 2, 23);
        }
    } else {
        max_width -= 32;
        let max_width = max_width.max(0) as u32;
        canvas.set_font(&FONT_MEDIUM);
        for (i, alert) in alerts.iter().take(MAX_ALERTS).enumerate() {
            let event = title_case(&alert.event);
            canvas.draw_multiline_string(
                ICON_LARGE + 32 + 3,
                5 + 17 + i as i32 * 32,
                &event,
                Align::Left,
                max_width,
                1,
                0,
            );
        }
    }
}

fn draw_status_bar<D>(canvas: &mut Canvas<'_, D>, refreshed: &str, offline: bool)
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    let size = canvas.size();
    let baseline = size.height as i32 - 2 - 2;
    let mut pos = size.width as i32 - 2;

    canvas.set_font(&FONT_SMALL);
    canvas.set_text_color(TriColor::Black);
    let updated = format!("{TXT_UPDATED} {refreshed}");
    canvas.draw_string(pos, baseline, &updated, Align::Right);
    pos -= canvas.text_width(&updated) + 12;

    if offline {
        canvas.set_text_color(TriColor::Red);
        canvas.draw_string(pos, baseline, TXT_OFFLINE, Align::Right);
        canvas.set_text_color(TriColor::Black);
    }
}
