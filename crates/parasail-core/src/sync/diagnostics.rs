//! Per-document ordering of diagnostics requests.
//!
//! Each `checkErrors` request is stamped with a sequence number. A response
//! is current only if no newer request for the same document was started
//! after it, so a slow stale answer never replaces a fresher one. A document
//! is dropped from the table once its newest request finishes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct DiagnosticsTracker {
    next: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl DiagnosticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new request for `uri` and return its sequence number.
    pub fn begin(&self, uri: &str) -> u64 {
        let seq = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        if let Ok(mut latest) = self.latest.lock() {
            latest.insert(uri.to_string(), seq);
        }
        seq
    }

    /// Complete request `seq` for `uri`. Returns whether it was still the
    /// newest one; if so the document entry is released.
    pub fn finish(&self, uri: &str, seq: u64) -> bool {
        let Ok(mut latest) = self.latest.lock() else {
            return false;
        };
        if latest.get(uri) == Some(&seq) {
            latest.remove(uri);
            true
        } else {
            false
        }
    }

    /// Number of documents with a request in flight.
    pub fn pending(&self) -> usize {
        self.latest.lock().map(|latest| latest.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_request_supersedes_older() {
        let tracker = DiagnosticsTracker::new();
        let first = tracker.begin("file:///a.psl");
        let second = tracker.begin("file:///a.psl");

        assert!(tracker.finish("file:///a.psl", second));
        assert!(!tracker.finish("file:///a.psl", first));
    }

    #[test]
    fn test_stale_finish_before_newer_keeps_entry() {
        let tracker = DiagnosticsTracker::new();
        let first = tracker.begin("file:///a.psl");
        let second = tracker.begin("file:///a.psl");

        assert!(!tracker.finish("file:///a.psl", first));
        assert_eq!(tracker.pending(), 1);
        assert!(tracker.finish("file:///a.psl", second));
    }

    #[test]
    fn test_finished_documents_are_released() {
        let tracker = DiagnosticsTracker::new();
        let a = tracker.begin("file:///a.psl");
        let b = tracker.begin("file:///b.psl");
        assert_eq!(tracker.pending(), 2);

        assert!(tracker.finish("file:///a.psl", a));
        assert!(tracker.finish("file:///b.psl", b));
        assert_eq!(tracker.pending(), 0);
    }
}
