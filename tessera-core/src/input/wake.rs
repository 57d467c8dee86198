//! Deferred dispatch requests
//!
//! Producers cannot run handlers themselves, so they ask the main context
//! to run the dispatcher "soon". Requests coalesce: any number of them
//! before the dispatcher runs result in a single run, which drains the
//! whole queue.

use portable_atomic::{AtomicBool, Ordering};

/// Something a producer can poke to get the dispatcher scheduled
///
/// `request_dispatch` is called from interrupt context and must not block.
pub trait WakeSignal {
    fn request_dispatch(&self);
}

impl<W: WakeSignal + ?Sized> WakeSignal for &W {
    fn request_dispatch(&self) {
        (**self).request_dispatch()
    }
}

/// Single-slot "dispatch requested" flag for polled idle loops
pub struct DispatchRequest {
    pending: AtomicBool,
}

impl Default for DispatchRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchRequest {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Consume the pending request, if any
    ///
    /// Returns `true` at most once per batch of requests.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Check for a pending request without consuming it
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl WakeSignal for DispatchRequest {
    fn request_dispatch(&self) {
        self.pending.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_coalesce() {
        let wake = DispatchRequest::new();
        assert!(!wake.take());

        wake.request_dispatch();
        wake.request_dispatch();
        wake.request_dispatch();
        assert!(wake.is_pending());

        assert!(wake.take());
        assert!(!wake.take());
        assert!(!wake.is_pending());
    }

    #[test]
    fn test_request_after_take_rearms() {
        let wake = DispatchRequest::new();
        wake.request_dispatch();
        assert!(wake.take());
        wake.request_dispatch();
        assert!(wake.take());
    }
}
