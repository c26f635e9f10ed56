//! # Hourly Outlook Chart
//!
//! A self-scaling line chart of temperature over a stippled bar chart of
//! precipitation probability, sharing one time axis.
//!
//! ## Axis scaling
//!
//! The temperature axis always has exactly five intervals whose bounds are
//! multiples of the tick step:
//!
//! 1. Start with a step of 5. The lower bound is `floor(min - 1)` rounded
//!    down to a multiple of the step, the upper bound `ceil(max + 1)` rounded
//!    up to a multiple.
//! 2. While that spans more than five steps, grow the step by 5 and recompute.
//! 3. While it spans fewer, widen whichever bound sits closer to the data.
//!
//! The percent axis is fixed at 0-100 in 20 % steps.
//!
//! Layout ([`ChartLayout::compute`]) is pure and separate from drawing
//! ([`draw_outlook_chart`]), so the geometry is testable without pixels.

use crate::canvas::{Align, Canvas, Painter};
use crate::framebuffer::TriColor;
use crate::text::{FONT_SMALL, FONT_TINY};
use crate::units::{Quantity, Temperature};
use crate::weather::format_timestamp;
use chrono::FixedOffset;
use embedded_graphics::prelude::*;
use log::debug;

/// Number of major intervals on the y axis.
pub const Y_INTERVALS: i32 = 5;
/// Upper limit on labelled x ticks.
pub const MAX_X_TICKS: usize = 8;

const STEP_INCREMENT: i32 = 5;
// Keeps the step search short for garbage readings.
const AXIS_LIMIT: f32 = 10_000.0;
const SECONDS_PER_HOUR: i64 = 3600;

/// Temperature axis bounds in display units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl Default for AxisRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: Y_INTERVALS * STEP_INCREMENT,
            step: STEP_INCREMENT,
        }
    }
}

impl AxisRange {
    /// Pick bounds for `values`. Non-finite values are ignored; with nothing
    /// left the default `0..25` axis is returned.
    pub fn for_values(values: impl IntoIterator<Item = f32>) -> Self {
        let Some((min, max)) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(-AXIS_LIMIT, AXIS_LIMIT))
            .fold(None, |acc: Option<(f32, f32)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
        else {
            return Self::default();
        };

        let low = (min - 1.0).floor() as i32;
        let high = (max + 1.0).ceil() as i32;
        let bounds = |step: i32| (round_down(low, step), round_up(high, step));

        let mut step = STEP_INCREMENT;
        let (mut lo, mut hi) = bounds(step);
        while (hi - lo) / step > Y_INTERVALS {
            step += STEP_INCREMENT;
            (lo, hi) = bounds(step);
        }
        while (hi - lo) / step < Y_INTERVALS {
            if min - lo as f32 <= hi as f32 - max {
                lo -= step;
            } else {
                hi += step;
            }
        }

        Self {
            min: lo,
            max: hi,
            step,
        }
    }

    pub fn intervals(&self) -> i32 {
        (self.max - self.min) / self.step
    }

    pub fn span(&self) -> f32 {
        (self.max - self.min) as f32
    }
}

fn round_down(value: i32, step: i32) -> i32 {
    value - value.rem_euclid(step)
}

fn round_up(value: i32, step: i32) -> i32 {
    let rem = value.rem_euclid(step);
    if rem == 0 {
        value
    } else {
        value + step - rem
    }
}

/// One point of the outlook series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartSample {
    /// Unix seconds.
    pub timestamp: i64,
    pub temperature: Quantity<Temperature>,
    /// In `0.0..=1.0`.
    pub precipitation_probability: f32,
}

impl ChartSample {
    pub fn new(timestamp: i64, temperature: Quantity<Temperature>, pop: f32) -> Self {
        let pop = if pop.is_finite() { pop.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            timestamp,
            temperature,
            precipitation_probability: pop,
        }
    }
}

/// Plot rectangle in screen pixels; `(x0, y0)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotArea {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PlotArea {
    /// The outlook area in the lower right of a `width` x `height` screen.
    pub fn for_screen(width: u32, height: u32) -> Self {
        Self {
            x0: 350,
            y0: 216,
            x1: width as i32 - 46,
            y1: height as i32 - 46,
        }
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YTick {
    pub y: i32,
    pub temperature: i32,
    pub percent: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XTick {
    /// Slot index; the closing tick uses the sample count.
    pub index: usize,
    pub x: i32,
    pub timestamp: i64,
}

/// Stipple column for one sample's precipitation probability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopBand {
    pub x0: i32,
    pub x1: i32,
    pub top: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    pub area: PlotArea,
    pub axis: AxisRange,
    pub unit: Temperature,
    pub sample_count: usize,
    pub x_stride: usize,
    pub slot_width: f32,
    pub y_ticks: Vec<YTick>,
    pub x_ticks: Vec<XTick>,
    /// Temperature line between consecutive slot centres.
    pub segments: Vec<(Point, Point)>,
    pub bands: Vec<PopBand>,
}

impl ChartLayout {
    pub fn compute(samples: &[ChartSample], area: PlotArea, unit: Temperature) -> Self {
        let temps: Vec<f32> = samples.iter().map(|s| s.temperature.in_unit(unit)).collect();
        let axis = AxisRange::for_values(temps.iter().copied());
        let n = samples.len();

        let y_interval = area.height() as f32 / Y_INTERVALS as f32;
        let y_ticks = (0..=Y_INTERVALS)
            .map(|i| YTick {
                y: (area.y0 as f32 + i as f32 * y_interval) as i32,
                temperature: axis.max - i * axis.step,
                percent: 100 - 20 * i,
            })
            .collect();

        let mut layout = Self {
            area,
            axis,
            unit,
            sample_count: n,
            x_stride: 0,
            slot_width: 0.0,
            y_ticks,
            x_ticks: Vec::new(),
            segments: Vec::new(),
            bands: Vec::new(),
        };
        if n == 0 {
            return layout;
        }

        let stride = n.div_ceil(MAX_X_TICKS);
        let slot = (area.x1 - area.x0 - 1) as f32 / n as f32;
        let px_per_degree = area.height() as f32 / axis.span();
        let x0 = area.x0 as f32;
        let first = samples[0].timestamp;

        let centre = |i: usize| (x0 + i as f32 * slot + 0.5 * slot).round() as i32;
        let level = |t: f32| {
            let t = t.clamp(-AXIS_LIMIT, AXIS_LIMIT);
            (area.y1 as f32 - px_per_degree * (t - axis.min as f32)).round() as i32
        };

        for i in 0..n {
            if i > 0 && temps[i - 1].is_finite() && temps[i].is_finite() {
                layout.segments.push((
                    Point::new(centre(i - 1), level(temps[i - 1])),
                    Point::new(centre(i), level(temps[i])),
                ));
            }

            let pop = samples[i].precipitation_probability;
            layout.bands.push(PopBand {
                x0: (x0 + 1.0 + i as f32 * slot).round() as i32,
                x1: (x0 + 1.0 + (i + 1) as f32 * slot).round() as i32,
                top: (area.y1 as f32 - area.height() as f32 * pop).round() as i32,
            });

            if i % stride == 0 {
                layout.x_ticks.push(XTick {
                    index: i,
                    x: (x0 + i as f32 * slot) as i32,
                    timestamp: first + i as i64 * SECONDS_PER_HOUR,
                });
            }
        }

        if n % stride == 0 {
            layout.x_ticks.push(XTick {
                index: n,
                x: (x0 + n as f32 * slot).round() as i32,
                timestamp: first + n as i64 * SECONDS_PER_HOUR,
            });
        }

        layout.x_stride = stride;
        layout.slot_width = slot;
        debug!(
            "outlook axis {}..{} step {} over {} samples, x stride {}",
            axis.min, axis.max, axis.step, n, stride
        );
        layout
    }
}

/// Rasterise a computed layout. Time labels are rendered with `hour_format`
/// in the report's UTC offset.
pub fn draw_outlook_chart<D>(
    canvas: &mut Canvas<'_, D>,
    layout: &ChartLayout,
    offset: FixedOffset,
    hour_format: &str,
) where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    if layout.sample_count == 0 {
        return;
    }
    let PlotArea { x0, x1, y1, .. } = layout.area;

    canvas.draw_line(x0, y1, x1, y1, TriColor::Black);
    canvas.draw_line(x0, y1 - 1, x1, y1 - 1, TriColor::Black);

    for (i, tick) in layout.y_ticks.iter().enumerate() {
        canvas.set_font(&FONT_SMALL);
        canvas.set_text_color(TriColor::Red);
        let label = format!("{}{}", tick.temperature, layout.unit.short_symbol());
        canvas.draw_string(x0 - 8, tick.y + 4, &label, Align::Right);

        canvas.set_text_color(TriColor::Black);
        canvas.draw_string(x1 + 8, tick.y + 4, &tick.percent.to_string(), Align::Left);
        canvas.set_font(&FONT_TINY);
        let after = canvas.cursor_x();
        canvas.draw_string(after, tick.y + 4, "%", Align::Left);

        if (i as i32) < Y_INTERVALS {
            let y = tick.y + tick.y.rem_euclid(2);
            for x in (x0..=x1 + 1).step_by(3) {
                canvas.draw_pixel(x, y, TriColor::Black);
            }
        }
    }

    for band in &layout.bands {
        let mut y = y1 - 1;
        while y > band.top {
            let mut x = band.x0 + band.x0.rem_euclid(2);
            while x < band.x1 {
                canvas.draw_pixel(x, y, TriColor::Black);
                x += 2;
            }
            y -= 2;
        }
    }

    for &(from, to) in &layout.segments {
        canvas.draw_line(from.x, from.y, to.x, to.y, TriColor::Red);
        canvas.draw_line(from.x, from.y + 1, to.x, to.y + 1, TriColor::Red);
        canvas.draw_line(from.x - 1, from.y, to.x - 1, to.y, TriColor::Red);
    }

    canvas.set_font(&FONT_SMALL);
    canvas.set_text_color(TriColor::Black);
    for tick in &layout.x_ticks {
        canvas.draw_line(tick.x, y1 + 1, tick.x, y1 + 4, TriColor::Black);
        canvas.draw_line(tick.x + 1, y1 + 1, tick.x + 1, y1 + 4, TriColor::Black);
        let label = format_timestamp(tick.timestamp, offset, hour_format);
        canvas.draw_string(tick.x, y1 + 20, &label, Align::Center);
    }
}
