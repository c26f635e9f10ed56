//! Render context and the painter contract.
//!
//! Every drawing call goes through a [`Canvas`], which owns the mutable
//! borrow of the target together with the current font, text colour and
//! cursor. Nothing about the drawing state is global, so two canvases over two
//! targets never interfere.

use crate::framebuffer::TriColor;
use crate::text::{Font, FONT_SMALL};
use crate::wrap::wrap;
use embedded_graphics::{
    mono_font::MonoTextStyle,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

/// The three operations a scene needs from a backend.
pub trait Painter {
    /// Draw `text` with its baseline at `y`.
    fn write(&mut self, x: i32, y: i32, text: &str);
    fn set_font(&mut self, font: &'static Font);
    /// Outline a rectangle.
    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: TriColor);
}

/// Horizontal anchor for [`Canvas::draw_string`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

pub struct Canvas<'a, D> {
    target: &'a mut D,
    font: &'static Font,
    text_color: TriColor,
    cursor: Point,
}

impl<'a, D> Canvas<'a, D>
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self {
            target,
            font: &FONT_SMALL,
            text_color: TriColor::Black,
            cursor: Point::zero(),
        }
    }

    pub fn size(&self) -> Size {
        self.target.bounding_box().size
    }

    pub fn font(&self) -> &'static Font {
        self.font
    }

    pub fn set_text_color(&mut self, color: TriColor) {
        self.text_color = color;
    }

    /// X position just past the last drawn string.
    pub fn cursor_x(&self) -> i32 {
        self.cursor.x
    }

    pub fn text_width(&self, text: &str) -> i32 {
        self.font.text_width(text) as i32
    }

    /// Draw `text` anchored at `x` with its baseline at `y`.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, align: Align) {
        let width = self.text_width(text);
        let x = match align {
            Align::Left => x,
            Align::Right => x - width,
            Align::Center => x - width / 2,
        };
        self.write(x, y, text);
    }

    /// Word-wrap `text` to `max_width` and draw the lines `line_spacing` apart.
    ///
    /// Returns the number of lines drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_multiline_string(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        align: Align,
        max_width: u32,
        max_lines: usize,
        line_spacing: i32,
    ) -> usize {
        let lines = wrap(self.font, text, max_width, max_lines);
        for (i, line) in lines.iter().enumerate() {
            self.draw_string(x, y + i as i32 * line_spacing, line, align);
        }
        lines.len()
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: TriColor) {
        Pixel(Point::new(x, y), color.into())
            .draw(&mut *self.target)
            .ok();
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: TriColor) {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color.into(), 1))
            .draw(&mut *self.target)
            .ok();
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: TriColor) {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(color.into()))
            .draw(&mut *self.target)
            .ok();
    }
}

impl<'a, D> Painter for Canvas<'a, D>
where
    D: DrawTarget,
    D::Color: From<TriColor>,
{
    fn write(&mut self, x: i32, y: i32, text: &str) {
        let origin = Point::new(x, y);
        let style = MonoTextStyle::new(self.font.face, self.text_color.into());
        self.cursor = Text::with_baseline(text, origin, style, Baseline::Alphabetic)
            .draw(&mut *self.target)
            .unwrap_or(origin);
    }

    fn set_font(&mut self, font: &'static Font) {
        self.font = font;
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: TriColor) {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_stroke(color.into(), 1))
            .draw(&mut *self.target)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::text::FONT_MEDIUM;

    #[test]
    fn test_cursor_follows_text() {
        let mut fb = FrameBuffer::new(200, 40);
        let mut canvas = Canvas::new(&mut fb);
        canvas.set_font(&FONT_MEDIUM);
        canvas.write(10, 20, "Wind");
        assert_eq!(canvas.cursor_x(), 10 + FONT_MEDIUM.text_width("Wind") as i32);
    }

    #[test]
    fn test_alignment() {
        let mut fb = FrameBuffer::new(200, 40);
        let mut canvas = Canvas::new(&mut fb);
        let width = canvas.text_width("1013 hPa");

        canvas.draw_string(150, 20, "1013 hPa", Align::Right);
        assert_eq!(canvas.cursor_x(), 150);

        canvas.draw_string(100, 20, "1013 hPa", Align::Center);
        assert_eq!(canvas.cursor_x(), 100 - width / 2 + width);
    }

    #[test]
    fn test_text_uses_current_color() {
        let mut fb = FrameBuffer::new(100, 30);
        {
            let mut canvas = Canvas::new(&mut fb);
            canvas.set_text_color(TriColor::Red);
            canvas.draw_string(2, 20, "Alert", Align::Left);
        }
        let inked: Vec<_> = fb.inked_pixels().collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|Pixel(_, c)| *c == TriColor::Red));
    }

    #[test]
    fn test_multiline_string() {
        let mut fb = FrameBuffer::new(200, 60);
        let mut canvas = Canvas::new(&mut fb);
        let max_width = canvas.text_width("Scattered");
        let drawn = canvas.draw_multiline_string(
            0,
            12,
            "Scattered clouds this afternoon",
            Align::Left,
            max_width as u32,
            2,
            12,
        );
        assert_eq!(drawn, 2);
    }

    #[test]
    fn test_rectangles() {
        let mut fb = FrameBuffer::new(20, 20);
        {
            let mut canvas = Canvas::new(&mut fb);
            canvas.draw_rect(0, 0, 5, 5, TriColor::Black);
            canvas.fill_rect(10, 10, 3, 3, TriColor::Red);
        }
        // 5x5 outline has 16 pixels, 3x3 fill has 9.
        assert_eq!(fb.inked_pixels().count(), 25);
        assert_eq!(fb.get_pixel(2, 2), Some(TriColor::White));
        assert_eq!(fb.get_pixel(11, 11), Some(TriColor::Red));
    }
}
