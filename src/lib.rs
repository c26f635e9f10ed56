//! # Weather EPD Core Library
//!
//! Renders a full weather snapshot (current conditions, a five day forecast,
//! alerts and a 48 hour outlook chart) into a three colour frame buffer for
//! slow-refresh e-paper panels.
//!
//! ## Design Philosophy
//!
//! ### Explicit Units
//! The provider reports base units (kelvin, m/s, metres, hPa). Every number
//! that reaches the layout is a [`units::Quantity`] tagged with its unit, and
//! conversion to the configured display unit happens at the point of drawing.
//!
//! ### Backend Independence
//! Layout code draws through [`canvas::Canvas`], which wraps any
//! `embedded_graphics` draw target whose colour converts from
//! [`framebuffer::TriColor`]:
//! - [`framebuffer::FrameBuffer`]: packed black and red bit planes, exported
//!   as PNG or ASCII
//! - any `BinaryColor` target, such as `MockDisplay` in tests
//!
//! The scene graph in [`scene`] only needs the three calls of
//! [`canvas::Painter`], so it can be driven by a recording painter as well.
//!
//! ### Data Flow
//! 1. **Online**: load a fresh cache or query One Call 3.0 and air pollution →
//!    cache → display
//! 2. **Offline**: synthesise a plausible report → mark as offline → display
//! 3. **Render**: [`dashboard::render_dashboard`] composes the frame, with the
//!    outlook chart laid out by [`chart::ChartLayout::compute`]
//!
//! ## Core Types
//! - [`WeatherSnapshot`]: a provider report, its air quality and an offline flag

use serde::{Deserialize, Serialize};

pub mod canvas;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod fallback;
pub mod framebuffer;
pub mod scene;
pub mod text;
pub mod units;
pub mod weather;
pub mod weather_data;
pub mod wrap;

use weather::{AirPollution, OneCall};

/// A weather report ready for rendering.
///
/// # Offline Behavior
/// When `offline = true` the report was synthesised by
/// [`fallback::approximate`] rather than fetched, and the status bar shows
/// "Offline data" in the accent colour.
///
/// # Example
/// ```
/// use weather_epd::{weather::OneCall, WeatherSnapshot};
///
/// let snapshot = WeatherSnapshot::online(OneCall::default());
/// assert!(!snapshot.offline);
/// assert!(snapshot.report.hourly.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub report: OneCall,
    /// Empty when the air pollution request failed
    #[serde(default)]
    pub air_quality: AirPollution,
    /// True if the report is synthetic
    pub offline: bool,
}

impl WeatherSnapshot {
    pub fn online(report: OneCall) -> Self {
        Self {
            report,
            air_quality: AirPollution::default(),
            offline: false,
        }
    }

    pub fn with_air_quality(mut self, air_quality: AirPollution) -> Self {
        self.air_quality = air_quality;
        self
    }
}
