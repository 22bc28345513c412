//! Time-boxed dedupe table for move-submission keys.
//!
//! A key is a duplicate while its mark is younger than the TTL. Expired
//! entries are dropped when they are looked at; nothing sweeps in the
//! background.
//!
//! Every mark carries a generation. The holder of a [`Mark`] can release
//! exactly that mark with [`Dedupe::clear_if`]; a newer mark placed on the
//! same key after the old one expired is left alone.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Handle on one placement of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    at: Instant,
    mark: Mark,
}

#[derive(Debug)]
pub struct Dedupe {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
    generation: AtomicU64,
}

impl Dedupe {
    pub fn new(ttl: Duration) -> Self {
        Dedupe {
            ttl,
            entries: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `key` was marked less than one TTL ago.
    pub fn is_duplicate(&self, key: &str) -> bool {
        let mut entries = self.entries();
        Self::live(&mut entries, key, self.ttl)
    }

    /// Record `key` as seen now, restarting its window.
    pub fn mark(&self, key: &str) -> Mark {
        let entry = self.fresh_entry();
        self.entries().insert(key.to_string(), entry);
        entry.mark
    }

    /// Forget `key` immediately, whoever marked it.
    pub fn clear(&self, key: &str) {
        self.entries().remove(key);
    }

    /// Forget `key` only if its current mark is `mark`. Returns whether an
    /// entry was removed.
    pub fn clear_if(&self, key: &str, mark: Mark) -> bool {
        let mut entries = self.entries();
        if entries.get(key).is_some_and(|entry| entry.mark == mark) {
            entries.remove(key);
            true
        } else {
            false
        }
    }

    /// Mark `key` unless it is already a live duplicate. Returns the new
    /// mark when this call placed it. Check and mark happen under one lock.
    pub fn try_mark(&self, key: &str) -> Option<Mark> {
        let mut entries = self.entries();
        if Self::live(&mut entries, key, self.ttl) {
            return None;
        }
        let entry = self.fresh_entry();
        entries.insert(key.to_string(), entry);
        Some(entry.mark)
    }

    /// Number of stored entries, expired ones not yet looked at included.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fresh_entry(&self) -> Entry {
        Entry {
            at: Instant::now(),
            mark: Mark {
                generation: self.generation.fetch_add(1, Ordering::Relaxed),
            },
        }
    }

    fn live(entries: &mut HashMap<String, Entry>, key: &str, ttl: Duration) -> bool {
        match entries.get(key) {
            Some(entry) if entry.at.elapsed() < ttl => true,
            Some(_) => {
                entries.remove(key);
                false
            }
            None => false,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn mark_then_duplicate_until_ttl() {
        let dedupe = Dedupe::new(Duration::from_millis(500));
        assert!(!dedupe.is_duplicate("k"));
        dedupe.mark("k");
        assert!(dedupe.is_duplicate("k"));

        tokio::time::advance(Duration::from_millis(499)).await;
        assert!(dedupe.is_duplicate("k"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!dedupe.is_duplicate("k"));
        // Expired entry was dropped by the lookup.
        assert!(dedupe.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_ignores_ttl() {
        let dedupe = Dedupe::new(Duration::from_secs(60));
        dedupe.mark("k");
        dedupe.clear("k");
        assert!(!dedupe.is_duplicate("k"));
    }

    #[tokio::test(start_paused = true)]
    async fn try_mark_is_exclusive() {
        let dedupe = Dedupe::new(Duration::from_secs(1));
        assert!(dedupe.try_mark("k").is_some());
        assert!(dedupe.try_mark("k").is_none());
        assert!(dedupe.try_mark("other").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(dedupe.try_mark("k").is_some());
        assert_eq!(dedupe.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_mark_cannot_clear_newer_one() {
        let dedupe = Dedupe::new(Duration::from_millis(100));
        let old = dedupe.try_mark("k").unwrap();
        tokio::time::advance(Duration::from_millis(100)).await;
        let new = dedupe.try_mark("k").unwrap();
        assert_ne!(old, new);

        assert!(!dedupe.clear_if("k", old));
        assert!(dedupe.is_duplicate("k"));
        assert!(dedupe.clear_if("k", new));
        assert!(!dedupe.is_duplicate("k"));
    }

    #[tokio::test(start_paused = true)]
    async fn remark_restarts_window() {
        let dedupe = Dedupe::new(Duration::from_millis(100));
        dedupe.mark("k");
        tokio::time::advance(Duration::from_millis(80)).await;
        dedupe.mark("k");
        tokio::time::advance(Duration::from_millis(80)).await;
        assert!(dedupe.is_duplicate("k"));
    }
}
