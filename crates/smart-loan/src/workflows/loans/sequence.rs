use std::sync::atomic::{AtomicU64, Ordering};

use super::domain::LoanId;

/// Seed used when no override is configured; the first issued id is 1001.
pub const DEFAULT_ID_SEED: u64 = 1000;

/// Monotonic id source owned by whichever component opens records.
#[derive(Debug)]
pub struct LoanIdSequence {
    last_issued: AtomicU64,
}

impl LoanIdSequence {
    pub fn new(seed: u64) -> Self {
        Self {
            last_issued: AtomicU64::new(seed),
        }
    }

    /// Next id, or `None` once `u64::MAX` has been issued.
    pub fn next_id(&self) -> Option<LoanId> {
        self.last_issued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |previous| {
                previous.checked_add(1)
            })
            .ok()
            .map(|previous| LoanId(previous + 1))
    }

    /// Most recently issued id, or the seed when nothing has been issued yet.
    pub fn last_issued(&self) -> u64 {
        self.last_issued.load(Ordering::Relaxed)
    }
}

impl Default for LoanIdSequence {
    fn default() -> Self {
        Self::new(DEFAULT_ID_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn issues_strictly_increasing_ids_from_seed() {
        let sequence = LoanIdSequence::new(5);
        assert_eq!(sequence.last_issued(), 5);
        assert_eq!(sequence.next_id(), Some(LoanId(6)));
        assert_eq!(sequence.next_id(), Some(LoanId(7)));
        assert_eq!(sequence.last_issued(), 7);
    }

    #[test]
    fn concurrent_callers_never_share_an_id() {
        let sequence = Arc::new(LoanIdSequence::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sequence = Arc::clone(&sequence);
                thread::spawn(move || {
                    (0..250)
                        .filter_map(|_| sequence.next_id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("worker finished") {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(sequence.last_issued(), DEFAULT_ID_SEED + 1000);
    }

    #[test]
    fn exhausted_sequence_stops_issuing() {
        let sequence = LoanIdSequence::new(u64::MAX - 1);
        assert_eq!(sequence.next_id(), Some(LoanId(u64::MAX)));
        assert_eq!(sequence.next_id(), None);
        assert_eq!(sequence.last_issued(), u64::MAX);
    }
}
