//! Battery sampling task
//!
//! Reads VBAT (GPIO29, through a 1/3 divider) and the 1.24V reference
//! (GPIO28) back to back so supply droop cancels out, then publishes the
//! result in millivolts for the dispatcher to pick up on its next redraw.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Timer};
use portable_atomic::Ordering;

use tessera_core::battery::{battery_millivolts, BatteryLevel};

use crate::channels::BATTERY_MV;
use crate::config::BATTERY_SAMPLE_SECS;

/// Reference settle time after enabling it
const REF_SETTLE: Duration = Duration::from_millis(1);

/// Hardware used by the battery task
pub struct BatteryPins {
    pub adc: Adc<'static, Async>,
    pub vbat: Channel<'static>,
    pub vref: Channel<'static>,
    pub vref_enable: Output<'static>,
}

/// Sample the battery every `BATTERY_SAMPLE_SECS`
#[embassy_executor::task]
pub async fn battery_task(mut pins: BatteryPins) -> ! {
    info!("Battery task started ({}s interval)", BATTERY_SAMPLE_SECS);

    loop {
        match sample(&mut pins).await {
            Some(mv) => {
                BATTERY_MV.store(mv, Ordering::Relaxed);
                let level = BatteryLevel::from_millivolts(mv);
                debug!("Battery: {}mV, {} bars", mv, level.bars());
                if level.is_critical() {
                    warn!("Battery critical: {}mV", mv);
                }
            }
            None => warn!("Battery sample failed"),
        }

        Timer::after_secs(BATTERY_SAMPLE_SECS).await;
    }
}

/// One VBAT reading compensated against the reference
async fn sample(pins: &mut BatteryPins) -> Option<u16> {
    pins.vref_enable.set_high();
    Timer::after(REF_SETTLE).await;

    let vbat = pins.adc.read(&mut pins.vbat).await;
    let vref = pins.adc.read(&mut pins.vref).await;

    pins.vref_enable.set_low();

    match (vbat, vref) {
        (Ok(vbat), Ok(vref)) => battery_millivolts(vbat, vref),
        _ => None,
    }
}
