//! UC8151 e-ink controller driver
//!
//! Blocking driver for the 2.9" 296x128 black/white panel on the Badger
//! 2040. Drawing goes to an in-memory [`Framebuffer`]; [`DisplaySurface::present`]
//! powers the panel up, streams the frame, waits for the refresh and powers
//! it down again.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use tessera_core::traits::{DisplayError, DisplayExt, DisplaySurface};

use super::framebuffer::{Framebuffer, HEIGHT, WIDTH};

/// Longest a full refresh is allowed to hold BUSY
const BUSY_TIMEOUT_MS: u32 = 10_000;

/// BUSY poll interval
const BUSY_POLL_MS: u32 = 1;

mod cmd {
    pub const PSR: u8 = 0x00;
    pub const PWR: u8 = 0x01;
    pub const POF: u8 = 0x02;
    pub const PON: u8 = 0x04;
    pub const BTST: u8 = 0x06;
    pub const DRF: u8 = 0x12;
    pub const DTM2: u8 = 0x13;
    pub const PLL: u8 = 0x30;
    pub const CDI: u8 = 0x50;
    pub const TCON: u8 = 0x60;
}

/// Panel setting: 128x296, OTP LUT, black/white, scan up, shift right,
/// booster on, no soft reset
const PSR_CONFIG: u8 = 0x9F;

/// Gives drawing code direct access to the frame
pub trait Canvas {
    fn framebuffer_mut(&mut self) -> &mut Framebuffer;
}

pub struct Uc8151<SPI, DC, RST, BUSY, D> {
    spi: SPI,
    dc: DC,
    reset: RST,
    busy: BUSY,
    delay: D,
    frame: Framebuffer,
    initialized: bool,
}

impl<SPI, DC, RST, BUSY, D> Uc8151<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, reset: RST, busy: BUSY, delay: D) -> Self {
        Self {
            spi,
            dc,
            reset,
            busy,
            delay,
            frame: Framebuffer::new(),
            initialized: false,
        }
    }

    /// Hardware reset and register setup
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.reset.set_low().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(10);
        self.reset.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(10);
        self.wait_busy()?;

        self.command(cmd::PSR, &[PSR_CONFIG])?;
        self.command(cmd::PWR, &[0x03, 0x00, 0x2B, 0x2B, 0x2B])?;
        self.command(cmd::BTST, &[0x17, 0x17, 0x17])?;
        self.command(cmd::PLL, &[0x3C])?;
        self.command(cmd::CDI, &[0x97])?;
        self.command(cmd::TCON, &[0x22])?;

        self.initialized = true;
        Ok(())
    }

    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(&[command]).map_err(|_| DisplayError::Bus)?;
        if !data.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Pin)?;
            self.spi.write(data).map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }

    /// BUSY is held low while the controller works
    fn wait_busy(&mut self) -> Result<(), DisplayError> {
        let mut waited = 0;
        while self.busy.is_low().map_err(|_| DisplayError::Pin)? {
            if waited >= BUSY_TIMEOUT_MS {
                return Err(DisplayError::Timeout);
            }
            self.delay.delay_ms(BUSY_POLL_MS);
            waited += BUSY_POLL_MS;
        }
        Ok(())
    }
}

impl<SPI, DC, RST, BUSY, D> Canvas for Uc8151<SPI, DC, RST, BUSY, D> {
    fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.frame
    }
}

impl<SPI, DC, RST, BUSY, D> DisplaySurface for Uc8151<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    fn width(&self) -> u16 {
        WIDTH
    }

    fn height(&self) -> u16 {
        HEIGHT
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.frame.fill(false);
        Ok(())
    }

    fn blit(
        &mut self,
        bitmap: &[u8],
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), DisplayError> {
        self.check_region(bitmap, x, y, width, height)?;
        self.frame.blit(bitmap, x, y, width, height);
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            self.init()?;
        }

        self.command(cmd::PON, &[])?;
        self.wait_busy()?;

        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(&[cmd::DTM2]).map_err(|_| DisplayError::Bus)?;
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        self.spi
            .write(self.frame.as_bytes())
            .map_err(|_| DisplayError::Bus)?;

        self.command(cmd::DRF, &[])?;
        let refreshed = self.wait_busy();

        // Power off even after a timeout
        self.command(cmd::POF, &[])?;
        if refreshed.is_err() {
            self.initialized = false;
        }
        refreshed
    }
}
