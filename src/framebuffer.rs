//! In-memory tri-colour frame buffer.
//!
//! Pixels are packed the way tri-colour e-paper controllers expect them: two
//! planes of one bit per pixel, rows of `ceil(width / 8)` bytes, most
//! significant bit leftmost. In the black plane a set bit is *white*; in the
//! red plane a set bit is red. A panel driver can stream [`FrameBuffer::black_plane`]
//! and [`FrameBuffer::red_plane`] unchanged, while the desktop harness exports
//! the same buffer as a PNG or an ASCII preview.

use embedded_graphics::{
    pixelcolor::{raw::RawU2, BinaryColor, PixelColor},
    prelude::*,
};
use image::{ImageFormat, ImageResult, Rgb, RgbImage};
use std::convert::Infallible;
use std::path::Path;

/// Colours a tri-colour panel can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriColor {
    White,
    Black,
    /// Accent colour.
    Red,
}

impl PixelColor for TriColor {
    type Raw = RawU2;
}

/// Monochrome panels render the accent colour as ink.
impl From<TriColor> for BinaryColor {
    fn from(color: TriColor) -> Self {
        match color {
            TriColor::White => BinaryColor::Off,
            TriColor::Black | TriColor::Red => BinaryColor::On,
        }
    }
}

const PAPER: Rgb<u8> = Rgb([0xEE, 0xEE, 0xEE]);
const INK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const ACCENT: Rgb<u8> = Rgb([0xC8, 0x10, 0x10]);

pub struct FrameBuffer {
    width: u32,
    height: u32,
    black: Vec<u8>,
    red: Vec<u8>,
}

impl FrameBuffer {
    /// A blank (white) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width.div_ceil(8) * height) as usize;
        Self {
            width,
            height,
            black: vec![0xFF; size],
            red: vec![0x00; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: TriColor) {
        let (black, red) = match color {
            TriColor::White => (0xFF, 0x00),
            TriColor::Black => (0x00, 0x00),
            TriColor::Red => (0xFF, 0xFF),
        };
        self.black.fill(black);
        self.red.fill(red);
    }

    pub fn black_plane(&self) -> &[u8] {
        &self.black
    }

    pub fn red_plane(&self) -> &[u8] {
        &self.red
    }

    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y * self.width.div_ceil(8) + x / 8) as usize;
        Some((index, 0x80 >> (x % 8)))
    }

    /// Set one pixel; coordinates outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: TriColor) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        match color {
            TriColor::White => {
                self.black[index] |= mask;
                self.red[index] &= !mask;
            }
            TriColor::Black => {
                self.black[index] &= !mask;
                self.red[index] &= !mask;
            }
            TriColor::Red => {
                self.black[index] |= mask;
                self.red[index] |= mask;
            }
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<TriColor> {
        let (index, mask) = self.locate(x, y)?;
        Some(if self.red[index] & mask != 0 {
            TriColor::Red
        } else if self.black[index] & mask == 0 {
            TriColor::Black
        } else {
            TriColor::White
        })
    }

    /// Every non-white pixel, row by row.
    pub fn inked_pixels(&self) -> impl Iterator<Item = Pixel<TriColor>> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| match self.get_pixel(x, y) {
                Some(TriColor::White) | None => None,
                Some(color) => Some(Pixel(Point::new(x as i32, y as i32), color)),
            })
        })
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| match self.get_pixel(x, y) {
            Some(TriColor::Black) => INK,
            Some(TriColor::Red) => ACCENT,
            _ => PAPER,
        })
    }

    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        self.to_image().save_with_format(path, ImageFormat::Png)
    }

    /// Terminal preview: each character covers a `scale` x `2 * scale` block.
    ///
    /// `#` marks ink, `*` accent, blank paper. Accent wins within a block.
    pub fn to_ascii(&self, scale: u32) -> String {
        let scale = scale.max(1);
        let (block_w, block_h) = (scale, scale * 2);
        let mut out = String::new();

        for row in 0..self.height.div_ceil(block_h) {
            for col in 0..self.width.div_ceil(block_w) {
                let mut cell = ' ';
                'block: for y in row * block_h..((row + 1) * block_h).min(self.height) {
                    for x in col * block_w..((col + 1) * block_w).min(self.width) {
                        match self.get_pixel(x, y) {
                            Some(TriColor::Red) => {
                                cell = '*';
                                break 'block;
                            }
                            Some(TriColor::Black) => cell = '#',
                            _ => {}
                        }
                    }
                }
                out.push(cell);
            }
            out.push('\n');
        }
        out
    }
}

impl DrawTarget for FrameBuffer {
    type Color = TriColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_new_buffer_is_white() {
        let fb = FrameBuffer::new(10, 3);
        // 10 px round up to 2 bytes per row.
        assert_eq!(fb.black_plane().len(), 6);
        assert!(fb.black_plane().iter().all(|&b| b == 0xFF));
        assert!(fb.red_plane().iter().all(|&b| b == 0x00));
        assert_eq!(fb.inked_pixels().count(), 0);
    }

    #[test]
    fn test_plane_packing() {
        let mut fb = FrameBuffer::new(16, 2);
        fb.set_pixel(0, 0, TriColor::Black);
        fb.set_pixel(9, 1, TriColor::Red);

        assert_eq!(fb.black_plane()[0], 0x7F, "black clears the bit");
        assert_eq!(fb.red_plane()[3], 0x40, "red sets bit 1 of byte 3");
        assert_eq!(fb.black_plane()[3], 0xFF, "red leaves the black plane white");

        assert_eq!(fb.get_pixel(0, 0), Some(TriColor::Black));
        assert_eq!(fb.get_pixel(9, 1), Some(TriColor::Red));
        assert_eq!(fb.get_pixel(1, 0), Some(TriColor::White));

        fb.set_pixel(9, 1, TriColor::White);
        assert_eq!(fb.red_plane()[3], 0x00);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.set_pixel(8, 0, TriColor::Black);
        fb.set_pixel(0, 100, TriColor::Black);
        assert_eq!(fb.get_pixel(8, 0), None);
        assert_eq!(fb.inked_pixels().count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new(8, 1);
        fb.clear(TriColor::Red);
        assert_eq!(fb.get_pixel(3, 0), Some(TriColor::Red));
        fb.clear(TriColor::Black);
        assert_eq!(fb.inked_pixels().count(), 8);
    }

    #[test]
    fn test_draw_target_clips_negative_points() {
        let mut fb = FrameBuffer::new(8, 8);
        Line::new(Point::new(-4, 2), Point::new(3, 2))
            .into_styled(PrimitiveStyle::with_stroke(TriColor::Black, 1))
            .draw(&mut fb)
            .ok();
        assert_eq!(fb.inked_pixels().count(), 4);
    }

    #[test]
    fn test_ascii_and_image_export() {
        // Scale 2 gives 2 x 4 blocks: two columns and two rows here.
        let mut fb = FrameBuffer::new(4, 8);
        fb.set_pixel(0, 0, TriColor::Black);
        fb.set_pixel(3, 7, TriColor::Red);
        assert_eq!(fb.to_ascii(2), "# \n *\n");

        let image = fb.to_image();
        assert_eq!(image.get_pixel(0, 0), &INK);
        assert_eq!(image.get_pixel(3, 7), &ACCENT);
        assert_eq!(image.get_pixel(1, 1), &PAPER);
    }

    #[test]
    fn test_ascii_block_is_twice_as_tall_as_wide() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.set_pixel(0, 0, TriColor::Black);
        fb.set_pixel(3, 3, TriColor::Red);
        assert_eq!(fb.to_ascii(2), "#*\n", "a 4 px tall buffer is one block row");
        assert_eq!(fb.to_ascii(0), fb.to_ascii(1), "scale is at least one");
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut fb = FrameBuffer::new(12, 6);
        fb.set_pixel(5, 5, TriColor::Red);
        fb.save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
