// src/scrape/links.rs
//! Per-traversal bookkeeping for dependent fetches: which handles are
//! already resolved, and how long to wait before the next request.

use std::collections::HashSet;
use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };
use std::thread;
use std::time::{ Duration, Instant };

use crate::core::deadline::Deadline;
use crate::error::{ PortalError, Result };

/// Keys already fetched (or deliberately skipped) in one traversal.
#[derive(Clone, Debug, Default)]
pub struct LinkResolutionCache {
    seen: HashSet<String>,
}

impl LinkResolutionCache {
    pub fn new() -> Self { Self::default() }

    /// Pre-mark keys the caller does not want fetched.
    pub fn seed<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seen.extend(keys.into_iter().map(Into::into));
    }

    pub fn should_fetch(&self, key: &str) -> bool {
        !self.seen.contains(key)
    }

    pub fn mark_fetched(&mut self, key: &str) {
        self.seen.insert(key.to_string());
    }

    pub fn len(&self) -> usize { self.seen.len() }

    pub fn is_empty(&self) -> bool { self.seen.is_empty() }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant { (**self).now() }
    fn sleep(&self, d: Duration) { (**self).sleep(d) }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
    fn sleep(&self, d: Duration) { thread::sleep(d) }
}

/// Virtual time. `sleep` returns at once, advancing the clock and
/// recording the requested wait.
#[derive(Clone, Debug)]
pub struct ManualClock {
    inner: Arc<Mutex<Manual>>,
}

#[derive(Debug)]
struct Manual {
    origin: Instant,
    offset: Duration,
    waits: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Manual { origin: Instant::now(), offset: Duration::ZERO, waits: Vec::new() })) }
    }

    fn lock(&self) -> MutexGuard<'_, Manual> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time since creation.
    pub fn elapsed(&self) -> Duration { self.lock().offset }

    pub fn advance(&self, d: Duration) { self.lock().offset += d }

    pub fn waits(&self) -> Vec<Duration> { self.lock().waits.clone() }
}

impl Default for ManualClock {
    fn default() -> Self { Self::new() }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let m = self.lock();
        m.origin + m.offset
    }

    fn sleep(&self, d: Duration) {
        let mut m = self.lock();
        m.offset += d;
        m.waits.push(d);
    }
}

pub trait RateLimiter {
    /// Block until the next dependent request may go out.
    fn wait_turn(&mut self, deadline: &Deadline) -> Result<()>;
}

/// Fixed pause before every request it gates.
#[derive(Debug)]
pub struct IntervalLimiter<C: Clock> {
    clock: C,
    interval: Duration,
    slice: Duration,
}

// Long waits are cut into slices so cancellation is noticed mid-pause.
const WAIT_SLICE: Duration = Duration::from_millis(100);

impl<C: Clock> IntervalLimiter<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self { clock, interval, slice: WAIT_SLICE }
    }

    pub fn interval(&self) -> Duration { self.interval }
}

impl<C: Clock> RateLimiter for IntervalLimiter<C> {
    fn wait_turn(&mut self, deadline: &Deadline) -> Result<()> {
        deadline.check()?;
        if deadline.remaining().is_some_and(|left| left < self.interval) {
            return Err(PortalError::DeadlineExceeded);
        }
        let until = self.clock.now() + self.interval;
        loop {
            let left = until.saturating_duration_since(self.clock.now());
            if left.is_zero() {
                return Ok(());
            }
            self.clock.sleep(left.min(self.slice));
            deadline.check()?;
        }
    }
}
