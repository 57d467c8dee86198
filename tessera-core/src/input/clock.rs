//! Millisecond debounce clock
//!
//! Timestamps are raw `u32` millisecond counts that wrap roughly every
//! 49.7 days. Elapsed time is always computed with wrapping subtraction,
//! so a press just after the wrap compares correctly against one just
//! before it.

/// Milliseconds since an arbitrary monotonic epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(pub u32);

impl Timestamp {
    /// Milliseconds from `earlier` to `self`, modulo 2^32
    pub const fn wrapping_since(self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }
}

/// Monotonic millisecond time source
///
/// Implementations must be callable from interrupt context.
pub trait Clock {
    /// Current time
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_simple() {
        let t1 = Timestamp(1_000);
        let t2 = Timestamp(1_250);
        assert_eq!(t2.wrapping_since(t1), 250);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let t1 = Timestamp(u32::MAX - 9);
        let t2 = Timestamp(40);
        assert_eq!(t2.wrapping_since(t1), 50);
    }

    #[test]
    fn test_elapsed_same_instant() {
        let t = Timestamp(u32::MAX);
        assert_eq!(t.wrapping_since(t), 0);
    }
}
