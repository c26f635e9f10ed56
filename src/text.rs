//! Font metrics and text measurement.
//!
//! Layout code never asks the display how wide a string is; it measures
//! against the same metrics table the glyphs are rasterised from. Bounds are
//! baseline-relative: `origin.y` is `-y_advance`, so a caller drawing at the
//! top-left corner of a box offsets the baseline by `-origin.y`.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::mono_font::{iso_8859_1, MonoFont};
use std::fmt;

/// Metrics of a single glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub width: u8,
    pub height: u8,
    /// Horizontal distance to the next glyph's origin.
    pub x_advance: u8,
    pub x_offset: i8,
    /// Offset from the baseline to the glyph's top edge.
    pub y_offset: i8,
}

/// A font: a contiguous glyph table plus the face used to draw it.
pub struct Font {
    pub name: &'static str,
    /// One entry per code point in `first..=last`.
    pub glyphs: &'static [Glyph],
    pub first: u32,
    pub last: u32,
    /// Line height.
    pub y_advance: u8,
    pub face: &'static MonoFont<'static>,
}

impl Font {
    /// Build a font whose metrics mirror a monospaced face.
    pub const fn from_mono(
        name: &'static str,
        glyphs: &'static [Glyph],
        face: &'static MonoFont<'static>,
    ) -> Self {
        Self {
            name,
            glyphs,
            first: LATIN1_FIRST,
            last: LATIN1_LAST,
            y_advance: face.character_size.height as u8,
            face,
        }
    }

    /// Metrics for `c`, or `None` when it falls outside the table.
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        let code = c as u32;
        if code < self.first || code > self.last {
            return None;
        }
        self.glyphs.get((code - self.first) as usize)
    }

    /// Pixel width of the widest line of `text`.
    pub fn text_width(&self, text: &str) -> u32 {
        measure(self, text).size.width
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("first", &self.first)
            .field("last", &self.last)
            .field("y_advance", &self.y_advance)
            .finish()
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Axis-aligned box relative to the text origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub origin: Point,
    pub size: Size,
}

/// Measure `text` in `font`.
///
/// Empty text yields zero bounds. Every `'\n'` adds a line; characters the
/// font has no glyph for contribute no width.
pub fn measure(font: &Font, text: &str) -> Bounds {
    if text.is_empty() {
        return Bounds::default();
    }

    let y_advance = u32::from(font.y_advance);
    let mut width = 0;
    let mut height = y_advance + 1;
    let mut line_width = 0;

    for c in text.chars() {
        if c == '\n' {
            height += y_advance;
            width = width.max(line_width);
            line_width = 0;
            continue;
        }
        if let Some(glyph) = font.glyph(c) {
            line_width += u32::from(glyph.x_advance);
        }
    }

    Bounds {
        origin: Point::new(0, -(y_advance as i32)),
        size: Size::new(width.max(line_width), height),
    }
}

const LATIN1_FIRST: u32 = 0x20;
const LATIN1_LAST: u32 = 0xFF;
const LATIN1_GLYPHS: usize = (LATIN1_LAST - LATIN1_FIRST + 1) as usize;

const fn mono_glyphs(face: &MonoFont<'static>) -> [Glyph; LATIN1_GLYPHS] {
    let glyph = Glyph {
        width: face.character_size.width as u8,
        height: face.character_size.height as u8,
        x_advance: (face.character_size.width + face.character_spacing) as u8,
        x_offset: 0,
        y_offset: -(face.baseline as i8),
    };
    [glyph; LATIN1_GLYPHS]
}

const GLYPHS_5X8: [Glyph; LATIN1_GLYPHS] = mono_glyphs(&iso_8859_1::FONT_5X8);
const GLYPHS_6X10: [Glyph; LATIN1_GLYPHS] = mono_glyphs(&iso_8859_1::FONT_6X10);
const GLYPHS_7X13: [Glyph; LATIN1_GLYPHS] = mono_glyphs(&iso_8859_1::FONT_7X13);
const GLYPHS_9X18_BOLD: [Glyph; LATIN1_GLYPHS] = mono_glyphs(&iso_8859_1::FONT_9X18_BOLD);
const GLYPHS_10X20: [Glyph; LATIN1_GLYPHS] = mono_glyphs(&iso_8859_1::FONT_10X20);

pub const FONT_TINY: Font = Font::from_mono("5x8", &GLYPHS_5X8, &iso_8859_1::FONT_5X8);
pub const FONT_SMALL: Font = Font::from_mono("6x10", &GLYPHS_6X10, &iso_8859_1::FONT_6X10);
pub const FONT_MEDIUM: Font = Font::from_mono("7x13", &GLYPHS_7X13, &iso_8859_1::FONT_7X13);
pub const FONT_LARGE: Font =
    Font::from_mono("9x18b", &GLYPHS_9X18_BOLD, &iso_8859_1::FONT_9X18_BOLD);
pub const FONT_HUGE: Font = Font::from_mono("10x20", &GLYPHS_10X20, &iso_8859_1::FONT_10X20);

#[cfg(test)]
mod tests {
    use super::*;

    // Proportional font covering 'a'..='c': a = 4px, b = 6px, c = 8px.
    const ABC: [Glyph; 3] = [
        Glyph { width: 3, height: 7, x_advance: 4, x_offset: 0, y_offset: -7 },
        Glyph { width: 5, height: 9, x_advance: 6, x_offset: 0, y_offset: -9 },
        Glyph { width: 7, height: 7, x_advance: 8, x_offset: 0, y_offset: -7 },
    ];

    const PROPORTIONAL: Font = Font {
        name: "abc",
        glyphs: &ABC,
        first: 'a' as u32,
        last: 'c' as u32,
        y_advance: 12,
        face: &iso_8859_1::FONT_6X10,
    };

    #[test]
    fn test_empty_text_has_zero_bounds() {
        assert_eq!(measure(&FONT_SMALL, ""), Bounds::default());
        assert_eq!(measure(&PROPORTIONAL, ""), Bounds::default());
    }

    #[test]
    fn test_single_line() {
        let bounds = measure(&PROPORTIONAL, "abc");
        assert_eq!(bounds.origin, Point::new(0, -12));
        assert_eq!(bounds.size, Size::new(18, 13));
    }

    #[test]
    fn test_newlines_take_widest_line() {
        let bounds = measure(&PROPORTIONAL, "c\nabc\nb");
        assert_eq!(bounds.size.width, 18);
        assert_eq!(bounds.size.height, 3 * 12 + 1);
    }

    #[test]
    fn test_out_of_range_characters_are_skipped() {
        assert_eq!(measure(&PROPORTIONAL, "a z?b").size.width, 10);
        assert_eq!(measure(&FONT_SMALL, "\u{20AC}").size.width, 0);
        // Still one line tall even with nothing printable.
        assert_eq!(measure(&PROPORTIONAL, "zz").size.height, 13);
    }

    #[test]
    fn test_mono_fonts_cover_latin1() {
        for font in [&FONT_TINY, &FONT_SMALL, &FONT_MEDIUM, &FONT_LARGE, &FONT_HUGE] {
            assert_eq!(font.glyphs.len(), LATIN1_GLYPHS, "{} table size", font.name);
            assert!(font.glyph('\u{B0}').is_some(), "{} has a degree sign", font.name);
            assert_eq!(font.y_advance as u32, font.face.character_size.height);
        }

        let advance = iso_8859_1::FONT_6X10.character_size.width
            + iso_8859_1::FONT_6X10.character_spacing;
        assert_eq!(FONT_SMALL.text_width("21\u{B0}C"), 4 * advance);
    }
}
