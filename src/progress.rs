// src/progress.rs
/// Lightweight progress reporting for listing traversals.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of listing rows.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One row's detail (and its handles) resolved.
    fn item_done(&mut self, _index: usize, _label: &str) {}

    /// One row's detail could not be resolved; the row is kept without it.
    fn item_failed(&mut self, _index: usize, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
