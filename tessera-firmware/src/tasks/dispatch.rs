//! Dispatch task
//!
//! Sleeps until a button task raises [`DISPATCH_SIGNAL`], then drains the
//! event queue through the debouncing dispatcher. Handlers run here, on the
//! thread executor, and may take as long as an e-ink refresh needs.

use defmt::*;

use tessera_core::badge::Badge;
use tessera_core::battery::BatteryLevel;
use tessera_core::input::Dispatcher;

use crate::channels::{latest_battery_mv, DISPATCH_SIGNAL, EVENT_QUEUE};
use crate::config::INPUT;
use crate::display::{EinkRenderer, Panel};

/// The badge as wired on this board
pub type BadgeApp = Badge<'static, EinkRenderer<Panel>>;

#[embassy_executor::task]
pub async fn dispatch_task(badge: &'static mut BadgeApp) -> ! {
    info!("Dispatch task started (bounce window {}ms)", INPUT.bounce_window_ms);

    let mut dispatcher = Dispatcher::new(INPUT);
    let mut dropped_seen = 0u32;

    refresh_battery(badge);
    if let Err(e) = badge.redraw() {
        warn!("Initial redraw failed: {}", e);
    }
    badge.take_error();

    loop {
        DISPATCH_SIGNAL.wait().await;

        refresh_battery(badge);
        let stats = dispatcher.run(&EVENT_QUEUE, badge);

        debug!(
            "Dispatched {} events: {} accepted, {} bounced, {} unhandled",
            stats.drained(),
            stats.accepted,
            stats.bounced,
            stats.unhandled
        );

        if let Some(e) = badge.take_error() {
            warn!("Redraw failed: {}", e);
        }

        let dropped = EVENT_QUEUE.dropped();
        if dropped != dropped_seen {
            warn!("Event queue overflowed, {} presses dropped so far", dropped);
            dropped_seen = dropped;
        }
    }
}

/// Hand the latest battery sample to the badge; skipped until the first one
fn refresh_battery(badge: &mut BadgeApp) {
    let mv = latest_battery_mv();
    if mv != 0 {
        badge.set_battery(BatteryLevel::from_millivolts(mv));
    }
}
