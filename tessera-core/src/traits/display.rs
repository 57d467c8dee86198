//! Display surface trait for the e-ink panel

/// Errors that can occur while driving the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer failed
    Bus,
    /// Control pin could not be driven or read
    Pin,
    /// Panel stayed busy past its refresh budget
    Timeout,
    /// Bitmap does not fit the given region or the panel
    OutOfBounds,
}

/// A 1-bit drawing surface
///
/// Drawing calls only touch the frame buffer; nothing reaches the glass
/// until [`DisplaySurface::present`].
pub trait DisplaySurface {
    /// Panel width in pixels
    fn width(&self) -> u16;

    /// Panel height in pixels
    fn height(&self) -> u16;

    /// Clear the frame buffer to the background colour
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Copy a packed 1-bit bitmap into the frame buffer
    ///
    /// `bitmap` is row-major, MSB first, each row padded to a whole byte.
    /// Set bits are ink.
    fn blit(
        &mut self,
        bitmap: &[u8],
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), DisplayError>;

    /// Push the frame buffer to the panel and refresh
    fn present(&mut self) -> Result<(), DisplayError>;
}

/// Bytes needed for a packed bitmap of the given size
pub const fn bitmap_len(width: u16, height: u16) -> usize {
    (width as usize).div_ceil(8) * height as usize
}

/// Helpers built on the primitive surface operations
pub trait DisplayExt: DisplaySurface {
    /// Check that a `width` x `height` bitmap placed at (`x`, `y`) fits
    fn check_region(
        &self,
        bitmap: &[u8],
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), DisplayError> {
        let fits_x = (x as u32) + (width as u32) <= self.width() as u32;
        let fits_y = (y as u32) + (height as u32) <= self.height() as u32;
        if !fits_x || !fits_y || bitmap.len() < bitmap_len(width, height) {
            return Err(DisplayError::OutOfBounds);
        }
        Ok(())
    }

    /// Replace the whole screen with one bitmap
    fn show_bitmap(
        &mut self,
        bitmap: &[u8],
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), DisplayError> {
        self.check_region(bitmap, x, y, width, height)?;
        self.clear()?;
        self.blit(bitmap, x, y, width, height)?;
        self.present()
    }
}

// Blanket implementation for all DisplaySurface types
impl<T: DisplaySurface> DisplayExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Blit(u16, u16, u16, u16),
        Present,
    }

    struct Recorder {
        ops: Vec<Op>,
    }

    impl DisplaySurface for Recorder {
        fn width(&self) -> u16 {
            296
        }

        fn height(&self) -> u16 {
            128
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            self.ops.push(Op::Clear);
            Ok(())
        }

        fn blit(
            &mut self,
            _bitmap: &[u8],
            x: u16,
            y: u16,
            width: u16,
            height: u16,
        ) -> Result<(), DisplayError> {
            self.ops.push(Op::Blit(x, y, width, height));
            Ok(())
        }

        fn present(&mut self) -> Result<(), DisplayError> {
            self.ops.push(Op::Present);
            Ok(())
        }
    }

    #[test]
    fn test_bitmap_len_pads_rows() {
        assert_eq!(bitmap_len(64, 64), 512);
        assert_eq!(bitmap_len(9, 2), 4);
        assert_eq!(bitmap_len(0, 10), 0);
    }

    #[test]
    fn test_show_bitmap_sequence() {
        let mut surface = Recorder { ops: Vec::new() };
        let bitmap = [0u8; 512];
        surface.show_bitmap(&bitmap, 8, 8, 64, 64).unwrap();
        assert_eq!(
            surface.ops,
            [Op::Clear, Op::Blit(8, 8, 64, 64), Op::Present]
        );
    }

    #[test]
    fn test_show_bitmap_rejects_overflow() {
        let mut surface = Recorder { ops: Vec::new() };
        let bitmap = [0u8; 512];
        assert_eq!(
            surface.show_bitmap(&bitmap, 260, 0, 64, 64),
            Err(DisplayError::OutOfBounds)
        );
        assert_eq!(
            surface.show_bitmap(&bitmap[..100], 0, 0, 64, 64),
            Err(DisplayError::OutOfBounds)
        );
        assert!(surface.ops.is_empty());
    }
}
