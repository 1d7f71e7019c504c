//! Request-id allocation for outbound frames.
//!
//! Each connection keeps one counter and stamps every outbound frame with a
//! fresh id. Only one request is ever outstanding per connection, so the only
//! hard requirements are that ids are non-negative (the server uses `-1` as
//! its authentication-failure sentinel) and distinct from the previous one in
//! flight. The counter wraps from `i32::MAX` back to 0 instead of ever going
//! negative.

use std::sync::atomic::{AtomicI32, Ordering};

/// Monotonically increasing allocator for frame request ids.
///
/// # Examples
///
/// ```rust
/// use rcon_core::RequestIdCounter;
///
/// let ids = RequestIdCounter::new();
/// assert_eq!(ids.next(), 0);
/// assert_eq!(ids.next(), 1);
/// ```
#[derive(Debug)]
pub struct RequestIdCounter {
    inner: AtomicI32,
}

impl RequestIdCounter {
    /// Creates a counter starting at 0.
    pub fn new() -> Self {
        Self {
            inner: AtomicI32::new(0),
        }
    }

    /// Returns the next request id and advances the counter.
    ///
    /// Wraps from `i32::MAX` back to 0; never yields a negative id.
    ///
    /// `Ordering::Relaxed` is sufficient: the id is only stamped onto a frame,
    /// it does not synchronise any other memory.
    pub fn next(&self) -> i32 {
        self.inner
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(if v == i32::MAX { 0 } else { v + 1 })
            })
            // fetch_update only fails when the closure returns None.
            .unwrap_or(0)
    }

    /// Returns the current value without advancing. Diagnostics only.
    pub fn current(&self) -> i32 {
        self.inner.load(Ordering::Relaxed)
    }
}

impl Default for RequestIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_zero() {
        let ids = RequestIdCounter::new();
        assert_eq!(ids.next(), 0);
    }

    #[test]
    fn test_counter_increments_monotonically() {
        let ids = RequestIdCounter::new();
        let values: Vec<i32> = (0..100).map(|_| ids.next()).collect();
        for window in values.windows(2) {
            assert!(window[1] > window[0]);
        }
    }

    #[test]
    fn test_counter_wraps_to_zero_not_negative() {
        // Arrange – start one step before overflow
        let ids = RequestIdCounter {
            inner: AtomicI32::new(i32::MAX),
        };

        // Act
        let before_wrap = ids.next();
        let after_wrap = ids.next();

        // Assert – the sentinel value -1 must be unreachable
        assert_eq!(before_wrap, i32::MAX);
        assert_eq!(after_wrap, 0);
    }

    #[test]
    fn test_current_does_not_advance() {
        let ids = RequestIdCounter::new();
        ids.next();
        assert_eq!(ids.current(), 1);
        assert_eq!(ids.next(), 1);
    }
}
