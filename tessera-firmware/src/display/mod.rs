//! E-ink panel support
//!
//! - `framebuffer`: 1-bit frame in panel memory order, an embedded-graphics target
//! - `uc8151`: SPI driver for the panel controller
//! - `renderer`: draws badge pages onto the frame

pub mod framebuffer;
pub mod renderer;
pub mod uc8151;

use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;

pub use renderer::{EinkRenderer, QrImage};
pub use uc8151::Uc8151;

/// SPI0 with its own chip select
pub type PanelSpi = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;

/// The Badger 2040 panel
pub type Panel = Uc8151<PanelSpi, Output<'static>, Output<'static>, Input<'static>, Delay>;
