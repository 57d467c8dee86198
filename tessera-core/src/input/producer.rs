//! Interrupt-side event producer
//!
//! One producer per button line. The platform calls
//! [`ButtonProducer::on_rising_edge`] from the edge interrupt; the producer
//! stamps the event, queues it and asks for a deferred dispatch. It never
//! blocks, retries or allocates.

use super::{ButtonId, Clock, EventQueue, WakeSignal};

/// Edge handler bound to a single button
pub struct ButtonProducer<'q, W, const N: usize> {
    button: ButtonId,
    queue: &'q EventQueue<N>,
    wake: &'q W,
}

impl<'q, W: WakeSignal, const N: usize> ButtonProducer<'q, W, N> {
    /// Create a producer for `button` feeding `queue`
    pub const fn new(button: ButtonId, queue: &'q EventQueue<N>, wake: &'q W) -> Self {
        Self {
            button,
            queue,
            wake,
        }
    }

    /// The button this producer reports
    pub fn button(&self) -> ButtonId {
        self.button
    }

    /// Handle a rising edge (interrupt context)
    ///
    /// Returns `false` if the queue was full and the event was dropped.
    /// A dropped event does not request a dispatch.
    pub fn on_rising_edge<C: Clock>(&self, clock: &C) -> bool {
        let now = clock.now();
        if self.queue.try_push(now, self.button) {
            self.wake.request_dispatch();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DispatchRequest, QueueEntry, Timestamp};
    use core::cell::Cell;

    struct FakeClock(Cell<u32>);

    impl Clock for FakeClock {
        fn now(&self) -> Timestamp {
            Timestamp(self.0.get())
        }
    }

    #[test]
    fn test_edge_queues_and_wakes() {
        let queue: EventQueue<4> = EventQueue::new();
        let wake = DispatchRequest::new();
        let clock = FakeClock(Cell::new(42));
        let producer = ButtonProducer::new(ButtonId::C, &queue, &wake);

        assert!(producer.on_rising_edge(&clock));
        assert!(wake.take());
        assert_eq!(
            queue.drain_one(),
            Some(QueueEntry::new(Timestamp(42), ButtonId::C))
        );
    }

    #[test]
    fn test_full_queue_drops_without_wake() {
        let queue: EventQueue<1> = EventQueue::new();
        let wake = DispatchRequest::new();
        let clock = FakeClock(Cell::new(0));
        let a = ButtonProducer::new(ButtonId::A, &queue, &wake);
        let b = ButtonProducer::new(ButtonId::B, &queue, &wake);

        assert!(a.on_rising_edge(&clock));
        assert!(wake.take());

        clock.0.set(5);
        assert!(!b.on_rising_edge(&clock));
        assert!(!wake.take());
        assert_eq!(queue.dropped(), 1);
        assert_eq!(
            queue.drain_one(),
            Some(QueueEntry::new(Timestamp(0), ButtonId::A))
        );
    }

    #[test]
    fn test_producers_share_one_queue() {
        let queue: EventQueue<8> = EventQueue::new();
        let wake = DispatchRequest::new();
        let clock = FakeClock(Cell::new(0));
        let producers = ButtonId::ALL.map(|button| ButtonProducer::new(button, &queue, &wake));

        for (i, producer) in producers.iter().enumerate() {
            clock.0.set(i as u32 * 10);
            assert!(producer.on_rising_edge(&clock));
        }

        assert!(wake.take());
        assert!(!wake.take());
        for (i, button) in ButtonId::ALL.iter().enumerate() {
            let entry = queue.drain_one().unwrap();
            assert_eq!(entry.button, *button);
            assert_eq!(entry.timestamp, Timestamp(i as u32 * 10));
        }
    }
}
