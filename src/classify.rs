// src/classify.rs
//! Status-code → message lookup.
//!
//! The portal documents several hundred numeric result codes. The table
//! itself lives with the caller; this crate only needs "give me the text
//! for code n", injected as a [`StatusText`].

use std::fmt;
use std::sync::Arc;

pub trait StatusText: Send + Sync {
    fn status_text(&self, code: u32) -> String;
}

impl<F> StatusText for F
where
    F: Fn(u32) -> String + Send + Sync,
{
    fn status_text(&self, code: u32) -> String {
        self(code)
    }
}

/// Fallback when no table is wired in: says which code it was.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnmappedStatus;

impl StatusText for UnmappedStatus {
    fn status_text(&self, code: u32) -> String {
        format!("status {code}")
    }
}

#[derive(Clone)]
pub struct ErrorClassifier {
    lookup: Arc<dyn StatusText>,
}

impl ErrorClassifier {
    pub fn new(lookup: impl StatusText + 'static) -> Self {
        Self { lookup: Arc::new(lookup) }
    }

    /// Message for a numeric code as it appears on the wire (`"012"`, `"4"`).
    /// Returns `None` when the segment is not a number.
    pub fn text(&self, code: &str) -> Option<String> {
        code.trim().parse::<u32>().ok().map(|n| self.lookup.status_text(n))
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(UnmappedStatus)
    }
}

impl fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorClassifier")
    }
}
