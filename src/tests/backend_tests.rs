//! The frame buffer and a monochrome `MockDisplay` must light the same pixels
//! for the same drawing calls.

use chrono::FixedOffset;
use embedded_graphics::mock_display::MockDisplay;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use weather_epd::canvas::{Align, Canvas, Painter};
use weather_epd::chart::{draw_outlook_chart, ChartLayout, ChartSample, PlotArea};
use weather_epd::framebuffer::{FrameBuffer, TriColor};
use weather_epd::scene::{Container, TextItem, Window};
use weather_epd::text::{FONT_SMALL, FONT_TINY};
use weather_epd::units::{Quantity, Temperature};

const SIDE: u32 = 64;

fn draw_sample_frame<D>(target: &mut D)
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    let mut canvas = Canvas::new(target);

    let window = Window::new().child(
        Container::at(2, 2)
            .child(TextItem::new(0, 0, "Hi 21", &FONT_SMALL).outlined(true))
            .child(TextItem::new(30, 0, "rain", &FONT_TINY)),
    );
    window.paint(&mut canvas);

    canvas.set_text_color(TriColor::Red);
    canvas.set_font(&FONT_TINY);
    canvas.draw_string(62, 22, "12%", Align::Right);
    canvas.fill_rect(0, 60, 10, 4, TriColor::Black);
    canvas.draw_line(-5, 30, 70, 40, TriColor::Red);

    let samples: Vec<ChartSample> = (0..6)
        .map(|i| {
            ChartSample::new(
                i * 3600,
                Quantity::new(12.0 + i as f32, Temperature::Celsius),
                i as f32 / 5.0,
            )
        })
        .collect();
    let area = PlotArea {
        x0: 20,
        y0: 34,
        x1: 58,
        y1: 54,
    };
    let layout = ChartLayout::compute(&samples, area, Temperature::Celsius);
    let utc = FixedOffset::east_opt(0).unwrap();
    draw_outlook_chart(&mut canvas, &layout, utc, "%H");
}

/// Ink in the tri-colour buffer maps to `On` in the monochrome mock.
#[test]
fn backends_light_the_same_pixels() {
    let mut frame = FrameBuffer::new(SIDE, SIDE);
    draw_sample_frame(&mut frame);

    let mut mock: MockDisplay<BinaryColor> = MockDisplay::new();
    mock.set_allow_overdraw(true);
    mock.set_allow_out_of_bounds_drawing(true);
    draw_sample_frame(&mut mock);

    let mut inked = 0;
    for y in 0..SIDE {
        for x in 0..SIDE {
            let framebuffer_ink = frame.get_pixel(x, y) != Some(TriColor::White);
            let mock_ink = mock.get_pixel(Point::new(x as i32, y as i32)) == Some(BinaryColor::On);
            assert_eq!(
                framebuffer_ink, mock_ink,
                "backends disagree at ({}, {})",
                x, y
            );
            inked += framebuffer_ink as usize;
        }
    }
    assert!(inked > 100, "sample frame should draw something ({inked} px)");
}

/// Accent drawing ends up in the red plane only.
#[test]
fn accent_lands_in_red_plane() {
    let mut frame = FrameBuffer::new(SIDE, SIDE);
    {
        let mut canvas = Canvas::new(&mut frame);
        canvas.fill_rect(8, 0, 8, 1, TriColor::Red);
    }
    assert_eq!(frame.red_plane()[1], 0xFF);
    assert_eq!(frame.black_plane()[1], 0xFF, "red pixels are not black");
    assert_eq!(frame.red_plane()[0], 0x00);
}
