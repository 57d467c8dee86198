//! Build-time configuration
//!
//! Everything here comes from badge.toml via build.rs. Pin assignments are
//! fixed by the Badger 2040 board:
//!
//! | Function        | GPIO |
//! |-----------------|------|
//! | Button A / B / C| 12 / 13 / 14 |
//! | Button Up / Down| 15 / 11 |
//! | Panel CLK / MOSI| 18 / 19 |
//! | Panel CS / DC   | 17 / 20 |
//! | Panel RESET     | 21 |
//! | Panel BUSY      | 26 |
//! | 3V3 enable      | 10 |
//! | 1V2 ref enable  | 27 |
//! | 1V2 ref ADC     | 28 |
//! | VBAT ADC        | 29 |

use tessera_core::card::Card;
use tessera_core::config::InputConfig;

include!(concat!(env!("OUT_DIR"), "/config_generated.rs"));

/// Optional pre-rendered QR code; empty when badge.toml has no [qr]
pub static QR_BITMAP: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/qr.bin"));

/// Input tuning from badge.toml
pub const INPUT: InputConfig = InputConfig::new(BOUNCE_WINDOW_MS);
