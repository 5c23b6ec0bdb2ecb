//! Injectable millisecond clock.
//!
//! Every stateful component in the workspace reads time through a
//! [`Clock`] reference instead of calling into the OS directly, so tests
//! drive state machines with a [`ManualClock`] and never sleep.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary but fixed origin.
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`], origin at construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and the emulated station.
///
/// Interior mutability lets tests keep an `&ManualClock` alongside the
/// component borrowing it as `&dyn Clock`.
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        ManualClock {
            now: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn starting_at(ms: u64) -> Self {
        ManualClock {
            now: AtomicU64::new(ms),
        }
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute instant. Panics in debug builds if this would
    /// move time backwards.
    pub fn set(&self, ms: u64) {
        debug_assert!(ms >= self.now.load(Ordering::SeqCst));
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Forwarding impl so a shared clock can be handed out as `Arc<ManualClock>`
/// while a test keeps its own handle for advancing time.
impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero_and_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0);
        clock.advance(250);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 500);
    }

    #[test]
    fn manual_clock_set_jumps_forward() {
        let clock = ManualClock::starting_at(1_000);
        clock.set(5_000);
        assert_eq!(clock.now_ms(), 5_000);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
