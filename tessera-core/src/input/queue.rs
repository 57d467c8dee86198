//! Interrupt-safe button event queue
//!
//! A fixed-capacity FIFO shared between the edge interrupts (producers)
//! and the main-context dispatcher (consumer). Both sides go through a
//! `critical_section::with` block that covers only the slot/index update;
//! timestamps are taken before entering it and handlers run after leaving
//! it.
//!
//! Overflow policy: once full, new pushes are dropped and counted. Entries
//! already queued are never overwritten.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use super::{ButtonId, Timestamp};
use crate::config::DEFAULT_QUEUE_CAPACITY;

/// A single edge event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueEntry {
    /// When the edge was seen
    pub timestamp: Timestamp,
    /// Which button produced it
    pub button: ButtonId,
}

impl QueueEntry {
    pub const fn new(timestamp: Timestamp, button: ButtonId) -> Self {
        Self { timestamp, button }
    }
}

struct Ring<const N: usize> {
    entries: Deque<QueueEntry, N>,
    dropped: u32,
}

/// Bounded FIFO of button events
///
/// All methods take `&self` so the queue can live in a `static` and be
/// handed to every producer and to the dispatcher.
pub struct EventQueue<const N: usize = DEFAULT_QUEUE_CAPACITY> {
    inner: Mutex<RefCell<Ring<N>>>,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Ring {
                entries: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Append an event (interrupt context)
    ///
    /// Returns `false` if the queue was full and the event was dropped.
    pub fn try_push(&self, timestamp: Timestamp, button: ButtonId) -> bool {
        let entry = QueueEntry::new(timestamp, button);
        critical_section::with(|cs| {
            let mut ring = self.inner.borrow_ref_mut(cs);
            match ring.entries.push_back(entry) {
                Ok(()) => true,
                Err(_) => {
                    ring.dropped = ring.dropped.wrapping_add(1);
                    false
                }
            }
        })
    }

    /// Remove the oldest event (main context)
    pub fn drain_one(&self) -> Option<QueueEntry> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).entries.pop_front())
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).entries.len())
    }

    /// Check if no events are queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued events
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Total pushes dropped because the queue was full
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(ms: u32, button: ButtonId) -> QueueEntry {
        QueueEntry::new(Timestamp(ms), button)
    }

    #[test]
    fn test_empty_queue() {
        let queue: EventQueue<4> = EventQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 4);
        assert_eq!(queue.drain_one(), None);
    }

    #[test]
    fn test_default_capacity() {
        let queue: EventQueue = EventQueue::new();
        assert_eq!(queue.capacity(), 8);
    }

    #[test]
    fn test_fifo_order() {
        let queue: EventQueue<8> = EventQueue::new();
        assert!(queue.try_push(Timestamp(5), ButtonId::B));
        assert!(queue.try_push(Timestamp(6), ButtonId::A));
        assert!(queue.try_push(Timestamp(7), ButtonId::Down));
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.drain_one(), Some(entry(5, ButtonId::B)));
        assert_eq!(queue.drain_one(), Some(entry(6, ButtonId::A)));
        assert_eq!(queue.drain_one(), Some(entry(7, ButtonId::Down)));
        assert_eq!(queue.drain_one(), None);
    }

    #[test]
    fn test_overflow_drops_new_entries() {
        let queue: EventQueue<2> = EventQueue::new();
        assert!(queue.try_push(Timestamp(0), ButtonId::A));
        assert!(queue.try_push(Timestamp(1), ButtonId::B));
        assert!(!queue.try_push(Timestamp(2), ButtonId::C));
        assert_eq!(queue.dropped(), 1);

        assert_eq!(queue.drain_one(), Some(entry(0, ButtonId::A)));
        assert_eq!(queue.drain_one(), Some(entry(1, ButtonId::B)));
        assert_eq!(queue.drain_one(), None);
    }

    #[test]
    fn test_space_frees_after_drain() {
        let queue: EventQueue<1> = EventQueue::new();
        assert!(queue.try_push(Timestamp(0), ButtonId::A));
        assert!(!queue.try_push(Timestamp(1), ButtonId::A));
        assert!(queue.drain_one().is_some());
        assert!(queue.try_push(Timestamp(2), ButtonId::A));
        assert_eq!(queue.drain_one(), Some(entry(2, ButtonId::A)));
    }

    #[test]
    fn test_push_while_draining_from_another_thread() {
        static QUEUE: EventQueue<8> = EventQueue::new();
        const PUSHES: u32 = 50_000;

        let producer = std::thread::spawn(|| {
            (0..PUSHES)
                .filter(|&ms| QUEUE.try_push(Timestamp(ms), ButtonId::A))
                .count() as u32
        });

        let mut drained = 0u32;
        let mut last: Option<Timestamp> = None;
        loop {
            // Checked before draining so the final pass sees every push
            let finished = producer.is_finished();
            while let Some(entry) = QUEUE.drain_one() {
                if let Some(prev) = last {
                    assert!(entry.timestamp.0 > prev.0, "reordered or duplicated");
                }
                last = Some(entry.timestamp);
                drained += 1;
            }
            if finished {
                break;
            }
            std::thread::yield_now();
        }

        let pushed_ok = producer.join().unwrap();
        assert_eq!(drained, pushed_ok);
        assert_eq!(drained + QUEUE.dropped(), PUSHES);
        assert!(QUEUE.is_empty());
    }

    fn arb_button() -> impl Strategy<Value = ButtonId> {
        (0..ButtonId::COUNT).prop_map(|i| ButtonId::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_fifo_within_capacity(
            pushes in proptest::collection::vec((any::<u32>(), arb_button()), 0..=8)
        ) {
            let queue: EventQueue<8> = EventQueue::new();
            for &(ms, button) in &pushes {
                prop_assert!(queue.try_push(Timestamp(ms), button));
            }
            for &(ms, button) in &pushes {
                prop_assert_eq!(queue.drain_one(), Some(entry(ms, button)));
            }
            prop_assert_eq!(queue.drain_one(), None);
            prop_assert_eq!(queue.dropped(), 0);
        }

        #[test]
        fn prop_overflow_keeps_oldest(
            pushes in proptest::collection::vec((any::<u32>(), arb_button()), 0..32)
        ) {
            let queue: EventQueue<4> = EventQueue::new();
            for (i, &(ms, button)) in pushes.iter().enumerate() {
                prop_assert_eq!(queue.try_push(Timestamp(ms), button), i < 4);
            }
            prop_assert!(queue.len() <= 4);
            for &(ms, button) in pushes.iter().take(4) {
                prop_assert_eq!(queue.drain_one(), Some(entry(ms, button)));
            }
            prop_assert_eq!(queue.drain_one(), None);
            prop_assert_eq!(queue.dropped() as usize, pushes.len().saturating_sub(4));
        }
    }
}
