// src/progress.rs
use std::path::Path;

/// Lightweight progress reporting used by the batch collector.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of documents.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes (e.g. a document lost fields to
    /// positional truncation).
    fn log(&mut self, _msg: &str) {}

    /// One document extracted; `records` is its row count after dedup.
    fn item_done(&mut self, _index: usize, _source: &Path, _records: usize) {}

    /// One document skipped because it could not be read or parsed.
    fn item_failed(&mut self, _index: usize, _source: &Path, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
