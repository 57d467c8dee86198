//! Button edge tasks
//!
//! One task per button. Each waits for a rising edge on its pull-down input
//! and hands the press to the core producer, which stamps it, queues it and
//! wakes the dispatcher. Nothing here runs application code.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use tessera_core::input::{ButtonId, ButtonProducer, Clock, Timestamp};

use crate::channels::{EVENT_QUEUE, WAKE};

/// Milliseconds since boot from the embassy time driver
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Timestamp {
        // Truncation is fine: consumers only compare with wrapping arithmetic
        Timestamp(Instant::now().as_millis() as u32)
    }
}

/// Watch one button and queue every rising edge
#[embassy_executor::task(pool_size = 5)]
pub async fn button_task(button: ButtonId, mut pin: Input<'static>) -> ! {
    debug!("Button task started: {}", button.label());

    let producer = ButtonProducer::new(button, &EVENT_QUEUE, &WAKE);

    loop {
        pin.wait_for_rising_edge().await;
        if !producer.on_rising_edge(&EmbassyClock) {
            trace!("Queue full, dropped {}", button.label());
        }
    }
}
