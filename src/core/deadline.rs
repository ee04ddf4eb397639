// src/core/deadline.rs
//! Caller-supplied bound on a workflow.
//!
//! Checked at the two places a workflow can stall: before each request
//! (which also caps that request's timeout) and around each courtesy pause.

use std::sync::Arc;
use std::sync::atomic::{ AtomicBool, Ordering };
use std::time::{ Duration, Instant };

use crate::error::{ PortalError, Result };

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }
    pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst) }
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

#[derive(Clone, Debug, Default)]
pub struct Deadline {
    at: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl Deadline {
    /// No time limit, not cancellable.
    pub fn none() -> Self { Self::default() }

    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant), cancel: None }
    }

    pub fn after(d: Duration) -> Self {
        Self::at(Instant::now() + d)
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Time left, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn check(&self) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(PortalError::Cancelled);
        }
        match self.remaining() {
            Some(left) if left.is_zero() => Err(PortalError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Per-request timeout: the configured one, shortened to what is left.
    pub fn bound(&self, configured: Duration) -> Duration {
        match self.remaining() {
            Some(left) => configured.min(left),
            None => configured,
        }
    }
}
