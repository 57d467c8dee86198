//! Shared state between the button tasks and the dispatcher
//!
//! The button tasks run on the interrupt executor and only ever push to
//! [`EVENT_QUEUE`] and raise [`DISPATCH_SIGNAL`]. Everything else happens on
//! the thread executor.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU16, Ordering};

use tessera_core::input::{EventQueue, WakeSignal};

use crate::config::QUEUE_CAPACITY;

/// Button presses waiting for the dispatcher
pub static EVENT_QUEUE: EventQueue<QUEUE_CAPACITY> = EventQueue::new();

/// Wakes the dispatch task; repeated signals before it runs collapse into one
pub static DISPATCH_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Latest battery voltage in millivolts, 0 until the first sample
pub static BATTERY_MV: AtomicU16 = AtomicU16::new(0);

/// [`WakeSignal`] backed by [`DISPATCH_SIGNAL`]
pub struct SignalWake;

impl WakeSignal for SignalWake {
    fn request_dispatch(&self) {
        DISPATCH_SIGNAL.signal(());
    }
}

/// Read the last stored battery voltage
pub fn latest_battery_mv() -> u16 {
    BATTERY_MV.load(Ordering::Relaxed)
}

/// Wake handle shared by all button producers
pub static WAKE: SignalWake = SignalWake;
