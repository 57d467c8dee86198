//! Main-context dispatcher
//!
//! Drains the event queue oldest-first, applies the per-button debounce
//! window and invokes the registered handler for every press that
//! survives the filter.
//!
//! Debounce compares each event against the last *accepted* press of the
//! same button. A bounced event does not move that reference point, so a
//! burst of chatter shorter than the window collapses into the first edge.

use super::{ButtonId, EventQueue, HandlerHost, QueueEntry, Timestamp};
use crate::config::InputConfig;

/// Outcome of the debounce filter for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Far enough from the previous accepted press
    Accepted,
    /// Inside the bounce window of the previous accepted press
    Bounced,
}

/// Counters for one dispatcher run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchStats {
    /// Presses that passed the debounce filter
    pub accepted: u16,
    /// Events discarded as switch bounce
    pub bounced: u16,
    /// Accepted presses with no handler bound
    pub unhandled: u16,
}

impl DispatchStats {
    /// Total events drained
    pub fn drained(&self) -> u16 {
        self.accepted.saturating_add(self.bounced)
    }
}

/// Debouncing dispatcher
pub struct Dispatcher {
    bounce_window_ms: u32,
    /// Timestamp of the last accepted press per button
    last_press: [Option<Timestamp>; ButtonId::COUNT],
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl Dispatcher {
    /// Create a dispatcher with no press history
    pub const fn new(config: InputConfig) -> Self {
        Self {
            bounce_window_ms: config.bounce_window_ms,
            last_press: [None; ButtonId::COUNT],
        }
    }

    /// Configured bounce window in milliseconds
    pub fn bounce_window_ms(&self) -> u32 {
        self.bounce_window_ms
    }

    /// Timestamp of the last accepted press of `button`
    pub fn last_press(&self, button: ButtonId) -> Option<Timestamp> {
        self.last_press[button.index()]
    }

    /// Apply the debounce filter to one event
    ///
    /// An accepted event becomes the new reference for its button.
    pub fn filter(&mut self, entry: QueueEntry) -> Verdict {
        let slot = &mut self.last_press[entry.button.index()];
        if let Some(last) = *slot {
            if entry.timestamp.wrapping_since(last) < self.bounce_window_ms {
                return Verdict::Bounced;
            }
        }
        *slot = Some(entry.timestamp);
        Verdict::Accepted
    }

    /// Drain `queue` and deliver accepted presses to `ctx`
    ///
    /// The queue is re-read after every handler, so events queued while a
    /// handler runs are served in this same pass.
    pub fn run<C: HandlerHost, const N: usize>(
        &mut self,
        queue: &EventQueue<N>,
        ctx: &mut C,
    ) -> DispatchStats {
        let mut stats = DispatchStats::default();

        while let Some(entry) = queue.drain_one() {
            match self.filter(entry) {
                Verdict::Bounced => {
                    stats.bounced = stats.bounced.saturating_add(1);
                }
                Verdict::Accepted => {
                    stats.accepted = stats.accepted.saturating_add(1);
                    let action = ctx.handlers().get(entry.button);
                    match action {
                        Some(action) => action(ctx),
                        None => stats.unhandled = stats.unhandled.saturating_add(1),
                    }
                }
            }
        }

        stats
    }
}
