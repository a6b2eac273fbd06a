//! Monochrome frame canvas.
//!
//! Views draw into this 128×64 1-bpp buffer through `embedded-graphics`.
//! The display front-end copies finished frames to the panel, and host
//! tests inspect pixels directly.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::{CANVAS_BUFFER_SIZE, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// 1-bit framebuffer, row-major, MSB first.
pub struct Canvas {
    buffer: [u8; CANVAS_BUFFER_SIZE],
}

impl Canvas {
    pub const fn new() -> Self {
        Self {
            buffer: [0; CANVAS_BUFFER_SIZE],
        }
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Read one pixel. Out-of-range coordinates read as off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match Self::locate(x, y) {
            Some((byte, mask)) => self.buffer[byte] & mask != 0,
            None => false,
        }
    }

    /// Number of pixels that are on.
    pub fn lit_pixels(&self) -> u32 {
        self.buffer.iter().map(|b| b.count_ones()).sum()
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|&b| b == 0)
    }

    /// Number of lit pixels inside the given rectangle.
    pub fn lit_pixels_in(&self, area: &embedded_graphics::primitives::Rectangle) -> u32 {
        area.points().filter(|p| self.pixel(p.x, p.y)).count() as u32
    }

    /// Every pixel of the frame, for copying into a display driver.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        (0..DISPLAY_HEIGHT as i32).flat_map(move |y| {
            (0..DISPLAY_WIDTH as i32).map(move |x| {
                Pixel(Point::new(x, y), BinaryColor::from(self.pixel(x, y)))
            })
        })
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= DISPLAY_WIDTH as i32 || y >= DISPLAY_HEIGHT as i32 {
            return None;
        }
        let index = y as usize * DISPLAY_WIDTH as usize + x as usize;
        Some((index / 8, 0x80 >> (index % 8)))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Clipped silently, like the panel itself.
            if let Some((byte, mask)) = Self::locate(point.x, point.y) {
                if color.is_on() {
                    self.buffer[byte] |= mask;
                } else {
                    self.buffer[byte] &= !mask;
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}
