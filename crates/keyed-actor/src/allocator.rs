//! # Identity Allocation
//!
//! Sequential identifiers starting at 1. The allocator only remembers the highest value
//! ever issued, so a removed entity's identifier is never handed out again.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter issuing strictly increasing identifiers.
///
/// Concurrent callers of [`IdAllocator::next_code`] always receive distinct values.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last_issued: AtomicU64,
}

impl IdAllocator {
    /// An allocator whose first identifier is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator continuing after a persisted high-water mark.
    pub fn resume_after(last_issued: u64) -> Self {
        Self {
            last_issued: AtomicU64::new(last_issued),
        }
    }

    /// Issues the next identifier, or `None` once `u64::MAX` has been issued.
    ///
    /// An exhausted allocator stays exhausted; it never wraps back to low values.
    pub fn next_code(&self) -> Option<u64> {
        self.last_issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .ok()
            .and_then(|previous| previous.checked_add(1))
    }

    /// Gives back `code` if it is still the most recently issued identifier.
    ///
    /// Returns `false` when another identifier was issued in the meantime; the code is then
    /// simply skipped.
    pub fn release(&self, code: u64) -> bool {
        self.last_issued
            .compare_exchange(code, code.saturating_sub(1), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Raises the high-water mark to at least `code`.
    pub fn observe(&self, code: u64) {
        self.last_issued.fetch_max(code, Ordering::SeqCst);
    }

    /// The highest identifier issued or observed so far (0 when none).
    pub fn last_issued(&self) -> u64 {
        self.last_issued.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn starts_at_one_and_increments() {
        let allocator = IdAllocator::new();
        assert_eq!(allocator.next_code(), Some(1));
        assert_eq!(allocator.next_code(), Some(2));
        assert_eq!(allocator.last_issued(), 2);
    }

    #[test]
    fn resumes_after_persisted_mark() {
        let allocator = IdAllocator::resume_after(41);
        assert_eq!(allocator.next_code(), Some(42));
    }

    #[test]
    fn release_only_rolls_back_the_latest_code() {
        let allocator = IdAllocator::new();
        let first = allocator.next_code().unwrap();
        let second = allocator.next_code().unwrap();
        assert!(!allocator.release(first));
        assert!(allocator.release(second));
        assert_eq!(allocator.next_code(), Some(second));
    }

    #[test]
    fn observe_never_lowers_the_mark() {
        let allocator = IdAllocator::new();
        allocator.observe(10);
        allocator.observe(3);
        assert_eq!(allocator.next_code(), Some(11));
    }

    #[test]
    fn concurrent_callers_get_distinct_codes() {
        let allocator = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| allocator.next_code().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for code in handle.join().unwrap() {
                assert!(seen.insert(code), "code {code} issued twice");
            }
        }
        assert_eq!(seen.len(), 2000);
        assert_eq!(*seen.iter().max().unwrap(), 2000);
    }

    #[test]
    fn exhausted_allocator_never_wraps() {
        let allocator = IdAllocator::resume_after(u64::MAX - 1);
        assert_eq!(allocator.next_code(), Some(u64::MAX));
        assert_eq!(allocator.next_code(), None);
        assert_eq!(allocator.next_code(), None);
        assert_eq!(allocator.last_issued(), u64::MAX);

        let observed = IdAllocator::new();
        observed.observe(u64::MAX);
        assert_eq!(observed.next_code(), None);
    }
}
