// run/clock.rs

//! Time abstraction for the polling loop.
//!
//! The poller reads time and sleeps only through [`Clock`], so tests can drive
//! it with [`FakeClock`] without any wall-clock delay.

#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(test)]
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Clock trait for time abstraction
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Block the current thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real clock backed by a monotonic [`Instant`].
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Fake clock for tests; `sleep` advances time instantly.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct FakeClock {
    current_millis: Arc<AtomicU64>,
}

#[cfg(test)]
impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        self.current_millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for FakeClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.current_millis.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// A fixed point on a [`Clock`]'s timeline after which no more work may start.
///
/// Created once per invocation and never moved: the deadline is expired as soon
/// as `now >= at`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    at: Duration,
    budget: Duration,
}

impl Deadline {
    /// A deadline `budget` from the clock's current time.
    pub fn after(clock: &dyn Clock, budget: Duration) -> Self {
        Self {
            at: clock.now().saturating_add(budget),
            budget,
        }
    }

    /// Time left before the deadline, or `None` once it has passed.
    pub fn remaining(&self, clock: &dyn Clock) -> Option<Duration> {
        let now = clock.now();
        if now >= self.at {
            None
        } else {
            Some(self.at - now)
        }
    }

    /// The total budget the deadline was created with.
    pub fn budget(&self) -> Duration {
        self.budget
    }
}
