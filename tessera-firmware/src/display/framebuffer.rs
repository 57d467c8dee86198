//! 1-bit frame buffer in UC8151 memory order
//!
//! The panel is 128 pixels wide and 296 tall in its native orientation; the
//! badge uses it landscape. Landscape column `x` is native row `x`, so each
//! landscape column occupies 16 consecutive bytes with the top pixel in the
//! MSB of the first byte. A set bit is white.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Landscape width in pixels
pub const WIDTH: u16 = 296;

/// Landscape height in pixels
pub const HEIGHT: u16 = 128;

/// Bytes per landscape column
const COLUMN_BYTES: usize = HEIGHT as usize / 8;

/// Frame buffer size in bytes
pub const BUFFER_LEN: usize = WIDTH as usize * COLUMN_BYTES;

pub struct Framebuffer {
    buf: [u8; BUFFER_LEN],
}

impl Framebuffer {
    /// A blank (white) frame
    pub const fn new() -> Self {
        Self {
            buf: [0xFF; BUFFER_LEN],
        }
    }

    /// Raw bytes in panel order
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Fill the whole frame with ink or paper
    pub fn fill(&mut self, ink: bool) {
        self.buf.fill(if ink { 0x00 } else { 0xFF });
    }

    /// Swap ink and paper everywhere
    pub fn invert(&mut self) {
        for byte in self.buf.iter_mut() {
            *byte = !*byte;
        }
    }

    /// Set one pixel; coordinates off the panel are ignored
    pub fn set_pixel(&mut self, x: u16, y: u16, ink: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let index = x as usize * COLUMN_BYTES + y as usize / 8;
        let mask = 0x80 >> (y % 8);
        if ink {
            self.buf[index] &= !mask;
        } else {
            self.buf[index] |= mask;
        }
    }

    /// Copy a packed row-major bitmap (MSB first, set = ink) into the frame
    ///
    /// The caller checks bounds; pixels falling off the panel are dropped.
    pub fn blit(&mut self, bitmap: &[u8], x: u16, y: u16, width: u16, height: u16) {
        let stride = (width as usize).div_ceil(8);
        for row in 0..height {
            for col in 0..width {
                let byte = bitmap
                    .get(row as usize * stride + col as usize / 8)
                    .copied()
                    .unwrap_or(0);
                let ink = byte & (0x80 >> (col % 8)) != 0;
                self.set_pixel(x.saturating_add(col), y.saturating_add(row), ink);
            }
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            self.set_pixel(x, y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}
